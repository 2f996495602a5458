fn main() {
    use clap::Parser;
    use std::error::Error;
    let args = tocmap::cli::Args::parse();
    tocmap::cli::init_logging(args.verbose);
    // Failures are reported, not signalled: the exit status stays zero.
    if let Err(e) = tocmap::cli::run(&args) {
        println!("{}", e);
        if args.verbose {
            let mut source = e.source();
            while let Some(s) = source {
                println!("  cause: {}", s);
                source = s.source();
            }
        }
    }
}
