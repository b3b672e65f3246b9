use anyhow::{bail, Context, Result};
use colored::*;
use serde_json::{json, Value};
use std::io::{self, Write};

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const SAMPLE_ROUTE_ID: i64 = 9001;

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🚚 Route Progress Testing Tool".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());
    println!();

    let base_url = get_base_url()?;
    let client = reqwest::Client::new();

    check_health(&client, &base_url).await?;

    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 🛣️ Registrar ruta de ejemplo");
        println!("2. 📥 Enviar foto de vehículos");
        println!("3. 📊 Ver progreso");
        println!("4. 🚪 Salir");
        print!("{}", "Selecciona una opción (1-4): ".bright_yellow());
        io::stdout().flush()?;

        let mut choice = String::new();
        io::stdin().read_line(&mut choice)?;

        let outcome = match choice.trim() {
            "1" => register_sample_route(&client, &base_url).await,
            "2" => push_sample_snapshot(&client, &base_url).await,
            "3" => show_progress(&client, &base_url).await,
            "4" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => {
                println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
                continue;
            }
        };

        if let Err(e) = outcome {
            println!("{} {:#}", "❌ Error:".bright_red().bold(), e);
        }
    }

    Ok(())
}

fn get_base_url() -> Result<String> {
    print!("{}", format!("URL del servidor [{}]: ", DEFAULT_BASE_URL).bright_yellow());
    io::stdout().flush()?;
    let mut url = String::new();
    io::stdin().read_line(&mut url)?;
    let url = url.trim().trim_end_matches('/');
    Ok(if url.is_empty() { DEFAULT_BASE_URL.to_string() } else { url.to_string() })
}

async fn check_health(client: &reqwest::Client, base_url: &str) -> Result<()> {
    let body: Value = client
        .get(format!("{}/health", base_url))
        .send()
        .await
        .context("el servidor no responde")?
        .json()
        .await?;

    println!(
        "{} {} rutas registradas",
        "✅ Servidor activo:".bright_green(),
        body["routes"]
    );
    Ok(())
}

async fn expect_success(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let body: Value = response.json().await?;
    if !status.is_success() {
        bail!("{} {}", status, body["message"]);
    }
    Ok(body)
}

async fn register_sample_route(client: &reqwest::Client, base_url: &str) -> Result<()> {
    println!("{}", "🛣️ ARMANDO RUTA DE EJEMPLO...".bright_cyan().bold());

    let built = expect_success(
        client
            .post(format!("{}/api/routes/build", base_url))
            .json(&json!({
                "id": SAMPLE_ROUTE_ID,
                "name": "Planta - Patio (ejemplo)",
                "stops": [
                    { "id": 1, "name": "Planta", "short_name": "P1", "section_time": 10, "transit_section_time": 20 },
                    { "id": 2, "name": "Báscula", "short_name": "P2", "section_time": 5, "transit_section_time": 15 },
                    { "id": 3, "name": "Patio", "short_name": "P3" }
                ]
            }))
            .send()
            .await?,
    )
    .await?;

    let registered = expect_success(
        client
            .put(format!("{}/api/routes/{}", base_url, SAMPLE_ROUTE_ID))
            .json(&built["data"]["route"])
            .send()
            .await?,
    )
    .await?;

    println!(
        "{} {} ({} pasos)",
        "✅".bright_green(),
        registered["message"].as_str().unwrap_or("Ruta registrada"),
        registered["data"]["steps_count"]
    );
    Ok(())
}

async fn push_sample_snapshot(client: &reqwest::Client, base_url: &str) -> Result<()> {
    println!("{}", "📥 ENVIANDO FOTO DE VEHÍCULOS...".bright_cyan().bold());

    let eta = eta_in_minutes(45);
    let response = expect_success(
        client
            .put(format!("{}/api/routes/{}/snapshot", base_url, SAMPLE_ROUTE_ID))
            .json(&json!({
                "events": [
                    {
                        "imei": 1001, "routeId": SAMPLE_ROUTE_ID, "short_name": "T-01",
                        "status": { "currentStep": "P1", "eta": eta },
                        "recentEvents": [ { "type": "ENTRY", "geofenceShortName": "P1" } ]
                    },
                    {
                        "imei": 1002, "routeId": SAMPLE_ROUTE_ID, "short_name": "T-02",
                        "status": { "currentStep": "Traslado a P3", "nextStep": "P3", "routeStatus": "Tarde", "exceededTime": 6 },
                        "recentEvents": [ { "type": "EXIT", "geofenceShortName": "P2" } ]
                    }
                ]
            }))
            .send()
            .await?,
    )
    .await?;

    print_progress(&response["data"]);
    Ok(())
}

async fn show_progress(client: &reqwest::Client, base_url: &str) -> Result<()> {
    let response = expect_success(
        client
            .get(format!("{}/api/routes/{}/progress", base_url, SAMPLE_ROUTE_ID))
            .send()
            .await?,
    )
    .await?;

    print_progress(&response["data"]);
    Ok(())
}

/// ETA en milisegundos desde época
fn eta_in_minutes(minutes: u64) -> u64 {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    now + minutes * 60_000
}

fn paint(text: &str, color: &str) -> ColoredString {
    match color {
        "#F14854" => text.bright_red(),
        "#F3BF14" => text.bright_yellow(),
        "#008000" => text.bright_green(),
        _ => text.bright_black(),
    }
}

fn print_progress(data: &Value) {
    println!();
    println!("{}", "📊 PROGRESO DE LA RUTA".bright_green().bold());
    println!("{}", "======================".bright_green());

    for step in data["badges"].as_array().into_iter().flatten() {
        let badge = |key: &str| {
            let text = step[key]["text"].as_str().unwrap_or("-");
            let color = step[key]["color"].as_str().unwrap_or("grey");
            paint(text, color)
        };
        println!(
            "  {:<6} en paso: {} [{}] | en traslado: {} [{}]",
            step["short_name"].as_str().unwrap_or("?"),
            step["vehicles_in_step"],
            badge("step_badge"),
            step["vehicles_in_transit"],
            badge("transit_badge"),
        );
    }

    let exceeded = data["exceeded"].as_array().cloned().unwrap_or_default();
    if !exceeded.is_empty() {
        println!("{}", "⏰ Tiempo excedido:".bright_red().bold());
        for row in exceeded {
            println!(
                "  {} en {} (+{} min)",
                row["display_name"].as_str().unwrap_or("?"),
                row["step_label"].as_str().unwrap_or("?"),
                row["exceeded_minutes"]
            );
        }
    }
}
