//! Terminal driver for the dishwise client.
//!
//! ```bash
//! dishwise-cli stats
//! dishwise-cli dishes --cuisine Sichuan --flavor spicy
//! dishwise-cli login alice alice@example.com
//! dishwise-cli profile --weight 70 --height 175 --cuisine Sichuan --allergy peanut
//! dishwise-cli recommend --meal-type lunch
//! dishwise-cli report
//! dishwise-cli logout
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dishwise::client::{
    api::HttpBackend,
    controller::App,
    notify::Severity,
    page::{DishForm, Modal, Page, ProfileForm, Section},
    session::FileSessionStore,
    tags::TagKind,
};
use dishwise::config::ClientConfig;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "dishwise-cli",
    about = "Dish recommendations from the terminal",
    long_about = "Drives the dishwise client against a running server: browse dishes, manage your profile, get recommendations and nutrition reports."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Server URL override (default: DISHWISE_API_URL or http://localhost:8080)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Where the login session is kept
    #[arg(long, global = true)]
    session_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// User and dish counts
    Stats,

    /// List dishes, optionally filtered
    Dishes {
        #[arg(long, default_value = "")]
        cuisine: String,
        #[arg(long, default_value = "")]
        flavor: String,
    },

    /// Log in with username and email
    Login { username: String, email: String },

    /// Forget the saved session
    Logout,

    /// Show who is logged in
    Whoami,

    /// Create or update your profile
    Profile {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        age: Option<String>,
        /// M or F
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        weight: Option<String>,
        #[arg(long)]
        height: Option<String>,
        #[arg(long = "cuisine")]
        cuisines: Vec<String>,
        #[arg(long = "flavor")]
        flavors: Vec<String>,
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
        #[arg(long = "allergy")]
        allergies: Vec<String>,
        #[arg(long = "disease")]
        diseases: Vec<String>,
        #[arg(long = "restriction")]
        restrictions: Vec<String>,
        /// Drop existing preference tags before adding the new ones
        #[arg(long)]
        clear_tags: bool,
    },

    /// Add a dish to the catalog
    AddDish {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        cuisine: String,
        #[arg(long, default_value = "")]
        flavor: String,
        #[arg(long, default_value = "")]
        price: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        calories: String,
        #[arg(long, default_value = "")]
        protein: String,
        #[arg(long, default_value = "")]
        fat: String,
        #[arg(long, default_value = "")]
        carbohydrate: String,
    },

    /// Generate recommendations for the logged-in user
    Recommend {
        /// breakfast, lunch, dinner or snack
        #[arg(long)]
        meal_type: Option<String>,
    },

    /// Generate today's nutrition report
    Report,

    /// Show past nutrition reports
    History,

    /// Compute BMI and BMR locally
    Metrics {
        #[arg(long, default_value = "")]
        weight: String,
        #[arg(long, default_value = "")]
        height: String,
        #[arg(long, default_value = "")]
        age: String,
        #[arg(long, default_value = "")]
        gender: String,
    },
}

fn print_toast(page: &Page) -> anyhow::Result<()> {
    if let Some(t) = page.toast.last() {
        println!("[{}] {}", t.severity.css_class(), t.message);
        if t.severity == Severity::Error {
            anyhow::bail!("{}", t.message);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    let defaults = ClientConfig::from_env();
    let api_url = cli.api_url.unwrap_or(defaults.api_url);
    let session_dir = cli.session_dir.unwrap_or(defaults.session_dir);
    debug!(%api_url, session_dir = %session_dir.display(), "client config");

    let mut app = App::new(
        HttpBackend::new(&api_url),
        FileSessionStore::new(session_dir),
    );

    if let Command::Metrics {
        weight,
        height,
        age,
        gender,
    } = &cli.command
    {
        app.set_profile_form(ProfileForm {
            weight: weight.clone(),
            height: height.clone(),
            age: age.clone(),
            gender: gender.clone(),
            ..Default::default()
        });
        println!("BMI: {}", app.page().bmi_value);
        println!("BMR: {}", app.page().bmr_value);
        return Ok(());
    }

    app.init().await;

    match cli.command {
        Command::Stats => {
            println!("users: {}", app.page().total_users);
            println!("dishes: {}", app.page().total_dishes);
        }
        Command::Dishes { cuisine, flavor } => {
            app.show_section(Section::Dishes);
            app.filter_dishes(&cuisine, &flavor);
            println!("{}", app.page().dishes_grid);
        }
        Command::Login { username, email } => {
            app.open_modal(Modal::Login);
            app.login(&username, &email).await;
            println!("user: {}", app.page().current_user_label);
        }
        Command::Logout => app.logout(),
        Command::Whoami => {
            let page = app.page();
            println!("user: {}", page.current_user_label);
            if app.current_user().is_some() {
                println!("BMI: {}", page.bmi_value);
                println!("BMR: {}", page.bmr_value);
                for (id, html) in &page.tag_containers {
                    println!("{id}: {html}");
                }
            }
        }
        Command::Profile {
            username,
            email,
            age,
            gender,
            weight,
            height,
            cuisines,
            flavors,
            ingredients,
            allergies,
            diseases,
            restrictions,
            clear_tags,
        } => {
            app.show_section(Section::Profile);
            if clear_tags {
                app.clear_tags();
            }
            let additions = [
                (TagKind::Cuisine, cuisines),
                (TagKind::Flavor, flavors),
                (TagKind::Ingredient, ingredients),
                (TagKind::Allergy, allergies),
                (TagKind::Disease, diseases),
                (TagKind::DietaryRestriction, restrictions),
            ];
            for (kind, values) in additions {
                for v in values {
                    app.submit_tag(kind, &v);
                }
            }

            let mut form = app.page().profile_form.clone();
            let fields = [
                (&mut form.username, username),
                (&mut form.email, email),
                (&mut form.age, age),
                (&mut form.gender, gender),
                (&mut form.weight, weight),
                (&mut form.height, height),
            ];
            for (slot, value) in fields {
                if let Some(v) = value {
                    *slot = v;
                }
            }
            app.save_profile(form).await;
            println!("user: {}", app.page().current_user_label);
            println!("BMI: {}  BMR: {}", app.page().bmi_value, app.page().bmr_value);
        }
        Command::AddDish {
            name,
            cuisine,
            flavor,
            price,
            description,
            calories,
            protein,
            fat,
            carbohydrate,
        } => {
            app.open_modal(Modal::AddDish);
            app.add_dish(DishForm {
                name,
                cuisine,
                flavor,
                price,
                description,
                calories,
                protein,
                fat,
                carbohydrate,
            })
            .await;
            println!("dishes: {}", app.page().total_dishes);
        }
        Command::Recommend { meal_type } => {
            app.show_section(Section::Recommendations);
            app.generate_recommendations(meal_type.as_deref()).await;
            println!("{}", app.page().recommendations_grid);
        }
        Command::Report => {
            app.show_section(Section::Nutrition);
            app.generate_nutrition_report().await;
            println!("{}", app.page().nutrition_report);
        }
        Command::History => {
            app.show_section(Section::Nutrition);
            app.show_nutrition_history().await;
            println!("{}", app.page().nutrition_report);
        }
        Command::Metrics { .. } => {}
    }

    print_toast(app.page())
}
