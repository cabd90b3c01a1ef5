use clap::Parser;

/// Adds the full duty itinerary, night hours, a reminder alarm and the
/// configured location to every work shift in an ICS duty calendar.
#[derive(Parser, Debug)]
#[command(name = "dutyCal")]
pub struct Cli {
    /// Path to a KEY=value config file (default: $HOME/.irena.conf).
    #[arg(short, long)]
    pub config: Option<String>,

    /// Username for portal authentication.
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password for portal authentication.
    #[arg(short, long)]
    pub password: Option<String>,

    /// Path of the duties ics file to modify.
    #[arg(short, long)]
    pub input: String,

    /// Output path of the modified ics file (default: out_<input>).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Location in format [Street City, Country].
    #[arg(short, long)]
    pub location: Option<String>,

    /// Local timezone for night-hour accounting.
    #[arg(short, long)]
    pub timezone: Option<String>,

    /// Keep going when a single duty fails to resolve.
    #[arg(long)]
    pub skip_failed: bool,
}
