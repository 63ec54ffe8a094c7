use std::path::PathBuf;

use clap::Parser;

/// Side-by-side "then and now" view of a heritage site.
#[derive(Debug, Parser)]
#[command(name = "timeleap", version, about)]
pub struct Cli {
    /// Site id to open with (defaults to the first site in the catalog)
    #[arg(long)]
    pub site: Option<String>,

    /// JSON file with an array of site records, instead of the built-in catalog
    #[arg(long, value_name = "PATH")]
    pub sites: Option<PathBuf>,

    /// Log filter in env_logger syntax, e.g. "debug" or "timeleap_compare=debug"
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1280.0)]
    pub width: f64,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 720.0)]
    pub height: f64,

    /// Height of the comparison band at the top of the window
    #[arg(long, default_value_t = 480.0)]
    pub band_height: f32,

    /// Present without waiting for vblank
    #[arg(long)]
    pub no_vsync: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["timeleap"]).unwrap();
        assert_eq!(cli.site, None);
        assert_eq!(cli.sites, None);
        assert_eq!(cli.width, 1280.0);
        assert_eq!(cli.height, 720.0);
        assert_eq!(cli.band_height, 480.0);
        assert!(!cli.no_vsync);
    }

    #[test]
    fn all_flags() {
        let cli = Cli::try_parse_from([
            "timeleap",
            "--site",
            "golconda_fort",
            "--sites",
            "extra.json",
            "--log",
            "debug",
            "--width",
            "900",
            "--height",
            "600",
            "--band-height",
            "360",
            "--no-vsync",
        ])
        .unwrap();
        assert_eq!(cli.site.as_deref(), Some("golconda_fort"));
        assert_eq!(cli.sites, Some(PathBuf::from("extra.json")));
        assert_eq!(cli.log.as_deref(), Some("debug"));
        assert_eq!(cli.width, 900.0);
        assert_eq!(cli.band_height, 360.0);
        assert!(cli.no_vsync);
    }

    #[test]
    fn rejects_non_numeric_size() {
        assert!(Cli::try_parse_from(["timeleap", "--width", "wide"]).is_err());
    }
}
