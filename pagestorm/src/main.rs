use pagestorm::{command_argument_builder, handle_crawl, init_tracing};

#[tokio::main]
async fn main() {
    init_tracing();

    let chosen_command = command_argument_builder().get_matches();

    match chosen_command.subcommand() {
        Some(("crawl", primary_command)) => handle_crawl(primary_command).await,
        Some(_) => unreachable!("clap should ensure we don't get here"),
        None => handle_crawl(&chosen_command).await,
    }
}
