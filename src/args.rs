use clap::Parser;

/// This is a tabulation program for pairwise (Condorcet) score voting.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The round description in JSON format: the candidates, the ballot file
    /// sources and the tally rules. For more information about the file format, read the
    /// documentation.
    #[clap(short, long, value_parser)]
    pub config: String,

    /// (file path) A reference file containing the summary of a round in JSON format. If
    /// provided, pairtally will check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the round will be written
    /// in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
