use clap::Parser;

#[derive(Parser)]
#[command(version, about = "Normalize proxy links and client config lines into JSON records", long_about = None)]
pub struct Args {
    #[arg(help = "Proxy list, one entry per line; `-` reads stdin")]
    pub input: String,

    #[arg(short, long, help = "Output path, defaults to stdout")]
    pub output: Option<String>,

    #[arg(short, long, help = "Emit debug log")]
    pub verbose: bool,

    #[arg(short, long, help = "Pretty-print the JSON output")]
    pub pretty: bool,

    #[arg(short, long, help = "Fail on the first line that cannot be decoded")]
    pub strict: bool,
}
