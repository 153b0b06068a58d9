use clap::builder::RangedU64ValueParser;
use clap::{Arg, arg, command};
use pagestorm_core::crawl::{
    DEFAULT_BASE_URL, DEFAULT_COMMENT_CLASS, DEFAULT_NEXT_ACCESSKEY, DEFAULT_START_PATH,
    DEFAULT_WORKERS,
};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("pagestorm")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("pagestorm")
        .about("Walks a paginated forum and hammers every comment thread it finds")
        .styles(CLAP_STYLING)
        // Running without a subcommand is the same as `pagestorm crawl`.
        .args(crawl_arguments())
        .args_conflicts_with_subcommands(true)
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .about(
                    "Follow next-page links from the start page, fetching each page's comment \
                links concurrently.",
                )
                .args(crawl_arguments()),
        )
}

fn crawl_arguments() -> Vec<Arg> {
    vec![
        arg!(-b --"base-url" <URL>)
            .required(false)
            .help("Base URL prepended verbatim to the start path and every discovered href")
            .default_value(DEFAULT_BASE_URL),
        arg!(-p --"start-path" <PATH>)
            .required(false)
            .help("Path of the first listing page")
            .default_value(DEFAULT_START_PATH),
        arg!(-t --"threads" <NUM_WORKERS>)
            .required(false)
            // Unset falls back to CrawlOptions::default().threads.
            .help(format!(
                "Number of concurrent comment fetches per page [default: {}]",
                DEFAULT_WORKERS
            ))
            .value_parser(RangedU64ValueParser::<usize>::new().range(1..)),
        arg!(--"timeout" <SECONDS>)
            .required(false)
            .help("Per-request timeout in seconds (default: wait forever)")
            .value_parser(RangedU64ValueParser::<u64>::new().range(1..)),
        arg!(--"max-pages" <N>)
            .required(false)
            .help("Stop after this many listing pages (default: until no next-page link)")
            .value_parser(RangedU64ValueParser::<usize>::new().range(1..)),
        arg!(--"comment-class" <CLASS>)
            .required(false)
            .help("CSS class marking comment-thread anchors")
            .default_value(DEFAULT_COMMENT_CLASS),
        arg!(--"next-accesskey" <KEY>)
            .required(false)
            .help("accesskey attribute value marking the next-page anchor")
            .default_value(DEFAULT_NEXT_ACCESSKEY),
        arg!(-f --"format" <FORMAT>)
            .required(false)
            .help("Summary format: text, json")
            .value_parser(["text", "json"])
            .default_value("text"),
        arg!(-o --"output" <PATH>)
            .required(false)
            .help("Write the summary to a file instead of the screen")
            .value_parser(clap::value_parser!(std::path::PathBuf)),
        arg!(-q --"quiet" "Suppress the banner and the end-of-run summary").required(false),
    ]
}
