use super::*;

pub fn init() -> ! {
    let path = get_config_file().unwrap_or_exit(|err| {
        eprintln!("ERROR! cannot get configuration directory: {:#}", err);
    });

    if path.is_file() {
        eprintln!("ERROR! configuration file already exists at..");
        println!("{}", path.display());
        exit(1)
    }

    println!("writing configuration file to..");
    println!("{}", path.display());
    println!();

    Config::write_default(&path).unwrap_or_exit(|err| {
        eprintln!("ERROR! cannot write default configuration file: {:#}", err);
    });
    exit(0)
}
