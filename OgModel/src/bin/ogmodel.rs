fn main() -> anyhow::Result<()> {
    ogmodel::cli::run_cli()
}
