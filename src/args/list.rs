use super::*;

pub fn list() -> ! {
    let default = Scenario::default();
    for scenario in Scenario::ALL {
        match *scenario == default {
            true => println!("{} (default)", scenario),
            false => println!("{}", scenario),
        }
    }
    exit(0)
}
