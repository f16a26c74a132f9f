use std::io;
use std::process::Command;

const OPENERS: [&str; 3] = ["xdg-open", "gio", "open"];

/// Hand a URL to the desktop shell's opener. Record navigation lands in
/// the system browser on the store's record form.
pub fn open_url(url: &str) -> io::Result<()> {
    let opener = OPENERS
        .iter()
        .find_map(|candidate| which::which(candidate).ok())
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no URL opener available"))?;

    let mut command = Command::new(&opener);
    if opener.file_name().is_some_and(|name| name == "gio") {
        command.arg("open");
    }

    command.arg(url).spawn().map(|_| ())
}
