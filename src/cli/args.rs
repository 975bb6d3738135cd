use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "sentiscope")]
#[command(about = "Sentiment analysis chat service", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Run the HTTP service (default when no command is given)
    Serve(ServeCliArgs),
    /// Analyze one message with the configured model and print the answer
    Analyze(TextInputArgs),
    /// Normalize confidence scores in text without calling the model
    Normalize(TextInputArgs),
    /// Show the config file location and effective settings
    Config,
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug, Default)]
pub struct ServeCliArgs {
    /// Override the configured listen port
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(ClapArgs, Debug)]
pub struct TextInputArgs {
    /// Text to process; read from stdin when omitted
    pub text: Option<String>,
}
