fn main() -> anyhow::Result<()> {
    booking_directory::run()
}
