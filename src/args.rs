use crate::encoding::TextEncoding;
use crate::render::DEFAULT_MIN_DOCUMENT_BYTES;
use clap::{value_t, App, Arg, ArgMatches};
use std::ffi::OsString;

const DEFAULT_OUTPUT_DIR: &str = "profiles";

pub struct Args {
    pub csv_file: String,
    pub output_dir: String,
    pub reference_file: Option<String>,
    pub encodings: Vec<TextEncoding>,
    pub min_size: u64,
    pub verbose: bool,
}

impl Args {
    pub fn parse() -> Self {
        Self::from_matches(Self::app().get_matches())
    }

    pub fn parse_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_matches(Self::app().get_matches_from(args))
    }

    fn app() -> App<'static, 'static> {
        App::new("product_profiles")
            .version("0.1.0")
            .about("Renders one profile document per catalog product")
            .arg(Arg::with_name("csv_file")
                .takes_value(true).required(true).help("path of CSV catalog to read from"))
            .arg(Arg::with_name("output_dir")
                .short("o").long("output-dir").takes_value(true)
                .default_value(DEFAULT_OUTPUT_DIR)
                .help("directory to write profile documents to, created if absent"))
            .arg(Arg::with_name("reference")
                .short("r").long("reference").takes_value(true)
                .help("JSON reference table to use instead of the built-in one"))
            .arg(Arg::with_name("encodings")
                .short("e").long("encodings").takes_value(true)
                .use_delimiter(true)
                .possible_values(&TextEncoding::ACCEPTED_NAMES)
                .case_insensitive(true)
                .help("catalog encodings to try, in priority order \
                       [default: utf-8,windows-1252,latin1]"))
            .arg(Arg::with_name("min_size")
                .long("min-size").takes_value(true)
                .validator(|v| v.parse::<u64>().map(|_| ()).map_err(|err| err.to_string()))
                .help("minimum size in bytes of a plausible document [default: 1024]"))
            .arg(Arg::with_name("verbose")
                .short("v").long("verbose").help("emit debug diagnostics"))
    }

    fn from_matches(matches: ArgMatches<'_>) -> Self {
        let encodings = matches
            .values_of("encodings")
            .map(|values| values.filter_map(|v| v.parse().ok()).collect())
            .unwrap_or_else(|| TextEncoding::DEFAULT_ORDER.to_vec());

        Self {
            csv_file: matches.value_of("csv_file").unwrap_or_default().to_string(),
            output_dir: matches.value_of("output_dir").unwrap_or(DEFAULT_OUTPUT_DIR).to_string(),
            reference_file: matches.value_of("reference").map(String::from),
            encodings,
            min_size: value_t!(matches, "min_size", u64).unwrap_or(DEFAULT_MIN_DOCUMENT_BYTES),
            verbose: matches.is_present("verbose"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_apply_defaults() {
        let args = Args::parse_from(vec!["product_profiles", "catalog.csv"]);

        assert_eq!(args.csv_file, "catalog.csv");
        assert_eq!(args.output_dir, "profiles");
        assert_eq!(args.reference_file, None);
        assert_eq!(args.encodings, TextEncoding::DEFAULT_ORDER.to_vec());
        assert_eq!(args.min_size, DEFAULT_MIN_DOCUMENT_BYTES);
        assert!(!args.verbose);
    }

    #[test]
    fn should_parse_overrides() {
        let args = Args::parse_from(vec![
            "product_profiles",
            "catalog.csv",
            "--output-dir",
            "out",
            "-r",
            "reference.json",
            "--encodings",
            "latin1,utf-8",
            "--min-size",
            "2048",
            "-v",
        ]);

        assert_eq!(args.output_dir, "out");
        assert_eq!(args.reference_file.as_deref(), Some("reference.json"));
        assert_eq!(args.encodings, vec![TextEncoding::Latin1, TextEncoding::Utf8]);
        assert_eq!(args.min_size, 2048);
        assert!(args.verbose);
    }

    #[test]
    fn should_accept_encoding_aliases() {
        let args = Args::parse_from(vec![
            "product_profiles",
            "catalog.csv",
            "--encodings",
            "cp1252,ISO-8859-1,utf8",
        ]);

        assert_eq!(
            args.encodings,
            vec![TextEncoding::Windows1252, TextEncoding::Latin1, TextEncoding::Utf8]
        );
    }

    #[test]
    fn should_reject_unknown_encoding() {
        let result = Args::app().get_matches_from_safe(vec![
            "product_profiles",
            "catalog.csv",
            "--encodings",
            "utf-16",
        ]);

        assert!(result.is_err());
    }
}
