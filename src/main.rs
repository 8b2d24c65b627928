use rask_logger_control::app;

fn main() -> anyhow::Result<()> {
    app::main()
}
