use academico_ia::{App, Config};
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化并运行应用（日志在初始化时启用）
    App::initialize(config).await.run().await?;

    Ok(())
}
