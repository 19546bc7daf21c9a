fn main() -> Result<(), Box<dyn std::error::Error>> {
    codemate::cli::main()
}
