use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::process;

const COMMANDS: &[&str] = &[
    "drawer-toggle",
    "mode drawer",
    "mode inline",
    "mark-all-read",
    "reconnect",
];

fn socket_path() -> PathBuf {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(runtime_dir).join("notify-hud.sock")
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        usage();
        process::exit(1);
    }

    let cmd = args.join(" ");
    if !COMMANDS.contains(&cmd.as_str()) {
        eprintln!("unknown command: {cmd}");
        usage();
        process::exit(1);
    }

    let path = socket_path();
    let mut stream = match UnixStream::connect(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("notify-hud not running ({path:?}): {e}");
            process::exit(1);
        }
    };

    if let Err(e) = writeln!(stream, "{cmd}") {
        eprintln!("failed to send command: {e}");
        process::exit(1);
    }
}

fn usage() {
    eprintln!("usage: notify-hud-ctl <command>");
    eprintln!();
    eprintln!("commands:");
    eprintln!("  drawer-toggle   open or close the drawer");
    eprintln!("  mode drawer     keep records in the drawer, newest first");
    eprintln!("  mode inline     show messages as toasts, oldest first");
    eprintln!("  mark-all-read   mark every record as read");
    eprintln!("  reconnect       drop the connection and open a new one");
}
