use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mailtailor::cli::{resolve_field, run_form};
use mailtailor::{
    AnthropicClient, CompletionClient, CustomizationRequest, CustomizeEmailUseCase, GoogleClient,
    MockClient, OpenAiClient, Provider,
};

#[derive(Parser)]
#[command(name = "mailtailor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use a canned completion instead of calling a real provider
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Customize an email template for a recipient
    Customize {
        /// Provider to use: openai, google, or anthropic
        #[arg(short, long, default_value = "openai")]
        provider: String,

        /// Model name; defaults to the provider's first known model
        #[arg(short, long)]
        model: Option<String>,

        /// Email template text
        #[arg(long)]
        template: Option<String>,

        /// Read the email template from a file
        #[arg(long, value_name = "PATH")]
        template_file: Option<PathBuf>,

        /// Recipient context text
        #[arg(long)]
        context: Option<String>,

        /// Read the recipient context from a file
        #[arg(long, value_name = "PATH")]
        context_file: Option<PathBuf>,

        /// Additional instructions or comments
        #[arg(long)]
        comments: Option<String>,

        /// Read the comments from a file
        #[arg(long, value_name = "PATH")]
        comments_file: Option<PathBuf>,

        /// API key; falls back to the provider's environment variable
        #[arg(short = 'k', long)]
        api_key: Option<String>,

        /// Write the customized email to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Fill in the form interactively on stdin
    Interactive,

    /// List known models per provider
    Models {
        /// Limit the listing to one provider
        #[arg(short, long)]
        provider: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Customize {
            provider,
            model,
            template,
            template_file,
            context,
            context_file,
            comments,
            comments_file,
            api_key,
            output,
        } => {
            let provider = Provider::from_str(&provider)?;
            let model = model.unwrap_or_else(|| provider.default_model().to_string());

            let template = resolve_field(template, template_file.as_deref())?.unwrap_or_default();
            let context = resolve_field(context, context_file.as_deref())?.unwrap_or_default();
            let comments = resolve_field(comments, comments_file.as_deref())?.unwrap_or_default();

            let request = CustomizationRequest::new(template, context).with_comments(comments);
            let client = build_client(provider, &model, api_key, cli.mock);
            let customized = run_customization(client, &request).await?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &customized)?;
                    println!("Customized email written to {}", path.display());
                }
                None => println!("{customized}"),
            }
        }

        Commands::Interactive => {
            let form = run_form()?;
            let client = build_client(form.provider, &form.model, form.api_key, cli.mock);
            let customized = run_customization(client, &form.request).await?;

            println!();
            println!("Customized Email");
            println!("================");
            println!("{customized}");
        }

        Commands::Models { provider } => {
            let selected: Vec<Provider> = match provider {
                Some(p) => vec![Provider::from_str(&p)?],
                None => Provider::ALL.to_vec(),
            };

            for provider in selected {
                println!("{} ({})", provider.display_name(), provider);
                for model in provider.models() {
                    println!("  {model}");
                }
                println!();
            }
        }
    }

    Ok(())
}

fn build_client(
    provider: Provider,
    model: &str,
    api_key: Option<String>,
    mock: bool,
) -> Arc<dyn CompletionClient> {
    if mock {
        info!("Using mock completion client");
        return Arc::new(MockClient::default());
    }

    match provider {
        Provider::OpenAi => {
            let mut client = OpenAiClient::from_env(model);
            if let Some(key) = api_key {
                client = client.with_api_key(key);
            }
            Arc::new(client)
        }
        Provider::Google => {
            let mut client = GoogleClient::from_env(model);
            if let Some(key) = api_key {
                client = client.with_api_key(key);
            }
            Arc::new(client)
        }
        Provider::Anthropic => {
            let mut client = AnthropicClient::from_env(model);
            if let Some(key) = api_key {
                client = client.with_api_key(key);
            }
            Arc::new(client)
        }
    }
}

async fn run_customization(
    client: Arc<dyn CompletionClient>,
    request: &CustomizationRequest,
) -> Result<String> {
    let use_case = CustomizeEmailUseCase::new(client);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("Invalid progress bar template"),
    );
    spinner.set_message("Customizing your email...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = use_case.execute(request).await;
    spinner.finish_and_clear();

    Ok(result?)
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn customize_defaults_to_openai() {
        let cli = Cli::try_parse_from(["mailtailor", "customize", "--template", "t"]).unwrap();
        match cli.command {
            Commands::Customize { provider, model, .. } => {
                assert_eq!(provider, "openai");
                assert!(model.is_none());
            }
            _ => panic!("expected customize command"),
        }
    }

    #[test]
    fn mock_flag_is_global() {
        let cli = Cli::try_parse_from(["mailtailor", "interactive", "--mock"]).unwrap();
        assert!(cli.mock);
    }

    #[test]
    fn copy_to_clipboard_flag_does_not_exist() {
        let res = Cli::try_parse_from(["mailtailor", "customize", "--copy"]);
        assert!(res.is_err(), "--copy should not be a valid flag");
    }
}
