fn main() -> cadence::error::Result<()> {
    cadence::runtime::run()
}
