use lcstrip::cli;

fn main() {
    let result = cli::parse_args(std::env::args_os()).and_then(|args| {
        cli::init_logger(args.log_level);
        cli::run(&args)
    });
    if let Err(err) = result {
        cli::report(&err);
        std::process::exit(err.exit_code());
    }
}
