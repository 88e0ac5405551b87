fn main() -> anyhow::Result<()> {
    let command_line_interface = setgen::cli::CommandLineInterface::load();
    command_line_interface.run()
}
