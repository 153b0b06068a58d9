pub mod crawl;
pub mod report;

use colored::Colorize;

pub fn print_banner() {
    eprintln!(
        "{} {}",
        "pagestorm".bright_cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    eprintln!("{}", "paginated forum crawler for load generation".bright_black());
    eprintln!();
}
