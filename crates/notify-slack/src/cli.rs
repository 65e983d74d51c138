use clap::Parser;

/// notify-slack – post or update a workflow notification in Slack
///
/// Channel, token and run details are read from the environment
/// (CHANNEL, TOKEN, STATUS, GITHUB_*); see the README for the full list.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Activate verbose output (-v, -vv, etc.)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Extra fields, one `title==value` pair per line
    #[arg(value_name = "FIELDS")]
    pub fields: Vec<String>,
}
