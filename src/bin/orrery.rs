use flow_orrery::{flow, settings::Settings};

fn main() -> anyhow::Result<()> {
    flow::run(Settings::default())
}
