use super::*;

pub fn dirs() -> ! {
    let config = Directories::config().unwrap_or_exit(|err| {
        eprintln!("ERROR! cannot get configuration directory: {:#}", err);
    });
    println!("configuration directory is at..");
    println!("{}", config.display());
    println!();
    exit(0)
}
