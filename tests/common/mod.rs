use assert_cmd::Command;

pub fn djedi_cmd() -> Command {
    Command::cargo_bin("djedi").unwrap()
}
