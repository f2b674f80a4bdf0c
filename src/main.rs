fn main() -> anyhow::Result<()> {
    let command_line_interface = gql_typegen::cli::CommandLineInterface::load();
    command_line_interface.run()
}
