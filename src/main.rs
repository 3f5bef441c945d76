use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use tracing::{debug, info};

use bot_location::{
    BingGeoSpatialService, DialogContext, LocationDialogConfig, LocationDialogResponse,
    LocationError, LocationRequiredFields, LocationRequiredFieldsDialog, LocationRetrieverDialog,
};

#[derive(Parser, Debug)]
#[command(name = "bot-location")]
#[command(about = "Resolve a location the way the bot dialog would")]
struct Args {
    /// Location as "lat,lon" or a free-text address
    location: String,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Required address fields, replacing the configured ones (e.g. locality,postal_code)
    #[arg(short, long, value_delimiter = ',')]
    require: Vec<String>,

    /// Do not reverse geocode picked coordinates
    #[arg(long)]
    no_reverse_geocode: bool,
}

/// Console stand-in for the bot engine's dialog stack
#[derive(Default)]
struct ConsoleContext {
    child: Option<LocationRequiredFieldsDialog>,
    response: Option<LocationDialogResponse>,
}

#[async_trait]
impl DialogContext for ConsoleContext {
    async fn call(&mut self, child: LocationRequiredFieldsDialog) -> bot_location::Result<()> {
        debug!("Child dialog started for {:?}", child.pending());
        self.child = Some(child);
        Ok(())
    }

    async fn done(&mut self, response: LocationDialogResponse) -> bot_location::Result<()> {
        self.response = Some(response);
        Ok(())
    }
}

/// Ask for every pending field on the terminal
fn collect_required_fields(dialog: &mut LocationRequiredFieldsDialog) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while let Some(prompt) = dialog.prompt() {
        print!("{prompt} ");
        io::stdout().flush()?;

        let line = lines
            .next()
            .ok_or_else(|| LocationError::dialog("Input closed before all fields were provided"))??;

        if let Err(e) = dialog.submit(&line) {
            println!("{}", e.user_message());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = LocationDialogConfig::load_from_path(args.config.clone())?;
    if args.no_reverse_geocode {
        config.dialog.reverse_geocode = false;
    }
    if !args.require.is_empty() {
        config.dialog.required_fields = args.require.clone();
    }

    bot_location::logging::init(&config.logging)?;

    let api_key = config
        .bing
        .api_key
        .clone()
        .ok_or_else(|| LocationError::config("Set bing.api_key or BOTLOCATION_BING__API_KEY"))?;
    let required_fields: LocationRequiredFields = config.dialog.required_fields()?;

    let service = Arc::new(BingGeoSpatialService::new(&config.bing)?);
    let mut dialog = LocationRetrieverDialog::new(
        api_key,
        service,
        config.dialog.options(),
        required_fields,
    )?;

    info!("Resolving '{}'", args.location);

    let mut context = ConsoleContext::default();
    dialog
        .retrieve_from_text(&mut context, &args.location)
        .await
        .with_context(|| format!("Failed to resolve '{}'", args.location))?;

    if let Some(mut child) = context.child.take() {
        collect_required_fields(&mut child)?;
        dialog
            .resume_after_child_dialog(&mut context, child.into_response()?)
            .await?;
    }

    let response = context
        .response
        .ok_or_else(|| LocationError::dialog("Dialog ended without a location"))?;

    println!("{}", response.location.display_label());
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
