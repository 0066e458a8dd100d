use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a single question and print the grounded answer
    Ask {
        question: String,

        /// Print the raw response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start an interactive conversation
    Chat,

    /// Show the effective settings
    Settings,
}
