use anyhow::Result;
use examtopics_scraper::utils::logging;
use examtopics_scraper::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 初始化并运行应用
    App::new(config).run().await?;

    Ok(())
}
