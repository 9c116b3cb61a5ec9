fn main() -> Result<(), Box<dyn std::error::Error>> {
    mcpdeck::cli::main()
}
