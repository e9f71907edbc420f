mod cli;

use crate::cli::{Cli, Command, OtaArgs, SetArgs, WifiArgs};
use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env, Target};
use esp32_cam_ui::{
    Esp32CamClient, MemoryPage, Page, Session,
    config::{AppConfig, DeviceConfig},
    menu::CAMERA_PREFIX,
    page::{MENU_SETTINGS, NAME_CLASS, OTA_MSG, SelectedFile, WIFI_MSG},
    services::firmware::REDIRECT_DELAY,
};
use log::{error, info, warn};
use std::{io::Write, sync::Arc};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    initialize();

    let mut config = AppConfig::load().context("failed to load configuration")?;
    if let Some(url) = &cli.device {
        config.device.url = DeviceConfig::parse_url(url)?;
    }
    info!("device: {}", config.device.url);

    let client =
        Esp32CamClient::new(&config.device).context("failed to create device client")?;

    match cli.command {
        Command::Menu => show_menu(client).await,
        Command::Set(args) => set(client, args).await,
        Command::Cmd { name } => {
            let session = Session::new(client, Arc::new(MemoryPage::main_page()));
            session
                .run_command(&name)
                .await
                .with_context(|| format!("command {name} failed"))?;
            println!("command {name} sent");
            Ok(())
        }
        Command::Ota(args) => upload_firmware(client, args).await,
        Command::Wifi(args) => setup_wifi(client, args).await,
    }
}

fn initialize() {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    builder.format(|f, record| match record.level() {
        log::Level::Error => {
            eprintln!("{}", record.args());
            Ok(())
        }
        _ => {
            writeln!(f, "{}", record.args())
        }
    });

    builder.target(Target::Stdout).init();

    info!("module version: {}", env!("CARGO_PKG_VERSION"));
}

async fn show_menu(client: Esp32CamClient) -> Result<()> {
    let mut session = Session::new(client, Arc::new(MemoryPage::main_page()));
    let result = session.load_settings(true).await;

    print_page(session.page(), MENU_SETTINGS);
    result.context("failed to load settings")
}

async fn set(client: Esp32CamClient, args: SetArgs) -> Result<()> {
    let mut session = Session::new(client, Arc::new(MemoryPage::main_page()));

    if args.unchecked {
        session.set_setting(&args.key, &args.value).await?;
    } else {
        let setting = if args.key.starts_with(CAMERA_PREFIX) {
            args.key
        } else {
            format!("{CAMERA_PREFIX}{}", args.key)
        };
        session
            .load_settings(true)
            .await
            .context("failed to load settings")?;
        session.change_setting(&setting, &args.value).await?;
    }

    println!("setting sent");
    Ok(())
}

async fn upload_firmware(client: Esp32CamClient, args: OtaArgs) -> Result<()> {
    let firmware = SelectedFile::read(&args.firmware)
        .await
        .with_context(|| format!("failed to read {}", args.firmware.display()))?;
    let page = Arc::new(MemoryPage::ota_page(&args.password, Some(firmware)));
    let mut session = Session::new(client, page);

    if let Err(e) = session.load_settings(false).await {
        warn!("device name unavailable: {e}");
    }

    let result = session.upload_firmware().await;
    print_page(session.page(), OTA_MSG);
    let outcome = result.context("firmware upload failed")?;

    if let Some(redirect) = outcome.redirect {
        println!(
            "device reboots, reconnecting in {}s",
            REDIRECT_DELAY.as_secs()
        );
        redirect.await.context("redirect task failed")?;
        for location in session.page().locations() {
            println!("-> {location}");
        }
    }

    Ok(())
}

async fn setup_wifi(client: Esp32CamClient, args: WifiArgs) -> Result<()> {
    let page = Arc::new(MemoryPage::wifi_page(
        &args.password,
        &args.ssid,
        &args.wifi_password,
    ));
    let mut session = Session::new(client, page);

    if let Err(e) = session.load_settings(false).await {
        warn!("device name unavailable: {e}");
    }

    let result = session.setup_wifi().await;
    print_page(session.page(), WIFI_MSG);
    result.context("wifi setup failed")?;

    Ok(())
}

fn print_page(page: &MemoryPage, content: &str) {
    for title in page.texts_with_class(NAME_CLASS) {
        println!("{title}");
    }
    println!();

    match page.menu(content) {
        Some(menu) => print!("{menu}"),
        None => {
            if let Some(text) = page.text(content).filter(|text| !text.is_empty()) {
                println!("{text}");
            }
        }
    }
}
