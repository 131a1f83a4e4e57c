mod host_mode;

const USAGE: &str = "usage: influence-app [--host]\n       influence-app render <markers.json> <schema.json> [config.json]";

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let code = match args.first().map(String::as_str) {
        None | Some("--host") => {
            host_mode::run_host_mode();
            0
        }
        Some("render") => host_mode::run_render(&args[1..]),
        Some("--help") | Some("-h") => {
            println!("{USAGE}");
            0
        }
        Some(other) => {
            eprintln!("unknown argument `{other}`\n{USAGE}");
            2
        }
    };
    std::process::exit(code);
}
