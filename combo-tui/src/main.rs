use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = combo_tui::cli::Cli::parse();
    combo_tui::run(&cli)
}
