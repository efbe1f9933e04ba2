use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Utc};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::backend::ObservanceClient;
use crate::config::AppConfig;
use crate::dashboard::{Notifier, PrayerDashboard};
use crate::models::{ObserverContext, PrayerName, PrayerStatus};
use crate::prayer_times::{CanonicalTimes, PrayerTimeProvider, SalahProvider, CALC_METHODS};
use crate::utils::format::{format_duration_secs, format_time_in};
use crate::utils::time::{current_time_in, resolve_timezone};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

#[allow(unused_macros)]
macro_rules! print_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        print!("\x1b[0m");
    }};
}

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

/// Prints dashboard outcomes to the terminal, the CLI's stand-in for toasts.
pub struct CliNotifier;

impl Notifier for CliNotifier {
    fn success(&self, message: &str) {
        println_colored!(GREEN, "  {}", message);
    }

    fn failure(&self, message: &str) {
        println_colored!(RED, "  {}", message);
    }
}

fn build_dashboard(
    config: &AppConfig,
) -> Result<PrayerDashboard<SalahProvider, ObservanceClient, CliNotifier>> {
    let provider = SalahProvider::new(
        &config.calculation.calc_method,
        &config.calculation.madhab,
    )?;
    let client = ObservanceClient::new(
        config.backend.base_url.clone(),
        config.backend.api_token.clone(),
    );
    Ok(PrayerDashboard::new(
        provider,
        client,
        CliNotifier,
        config.observer.context(),
    ))
}

fn location_label(config: &AppConfig) -> String {
    if config.observer.location_name.is_empty() {
        format!("{}, {}", config.observer.latitude, config.observer.longitude)
    } else {
        config.observer.location_name.clone()
    }
}

fn status_style(status: &PrayerStatus) -> (&'static str, &'static str) {
    match status {
        PrayerStatus::Pending => (DIM, "pending"),
        PrayerStatus::OnTime => (GREEN, "on time"),
        PrayerStatus::Late => (AMBER, "late"),
        PrayerStatus::Missed => (RED, "missed"),
    }
}

// ─── Setup ───────────────────────────────────────────────────────────────────

pub fn handle_setup(config: &mut AppConfig, reset: bool) -> Result<()> {
    let path = AppConfig::config_path()?;
    if path.exists() && !reset {
        println!("mutabaah is already configured. Use --reset to reconfigure.");
        return Ok(());
    }

    println!();
    println_colored!(GOLD, "  mutabaah setup");
    println!();

    config.observer.location_name =
        prompt_string("Location name", &config.observer.location_name)?;
    config.observer.latitude = prompt_f64("Latitude", config.observer.latitude)?;
    config.observer.longitude = prompt_f64("Longitude", config.observer.longitude)?;
    config.observer.timezone = prompt_string(
        "Timezone (IANA name, e.g. Asia/Jakarta)",
        &config.observer.timezone,
    )?;
    config.backend.base_url = prompt_string("Backend URL", &config.backend.base_url)?;

    println!();
    println_colored!(DIM, "  Calculation methods: {}", CALC_METHODS.join(", "));
    config.calculation.calc_method =
        prompt_string("Calculation method", &config.calculation.calc_method)?;
    config.calculation.madhab =
        prompt_string("Madhab (Hanafi or Shafi)", &config.calculation.madhab)?;

    // Validate method + madhab before persisting
    SalahProvider::new(&config.calculation.calc_method, &config.calculation.madhab)?;

    config.save()?;
    println!();
    println_colored!(GREEN, "  Saved to {}", path.display());
    Ok(())
}

fn prompt_string(label: &str, current: &str) -> Result<String> {
    if current.is_empty() {
        print!("  {}: ", label);
    } else {
        print!("  {} [{}]: ", label, current);
    }
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Ok(current.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

fn prompt_f64(label: &str, current: f64) -> Result<f64> {
    loop {
        let raw = prompt_string(label, &current.to_string())?;
        match raw.parse::<f64>() {
            Ok(value) => return Ok(value),
            Err(_) => println_colored!(RED, "  Not a number: {}", raw),
        }
    }
}

// ─── Times ───────────────────────────────────────────────────────────────────

pub fn handle_times(config: &AppConfig) -> Result<()> {
    let observer = config.observer.context();
    let tz = resolve_timezone(&observer.timezone);
    let now = current_time_in(&observer.timezone);
    let now_utc = now.to_utc();

    let provider = SalahProvider::new(
        &config.calculation.calc_method,
        &config.calculation.madhab,
    )?;
    let times = provider.canonical_times(&observer, now.date_naive())?;

    println!();
    println_colored!(
        GOLD,
        "  Prayer Times — {} ({})",
        location_label(config),
        now.format("%Y-%m-%d")
    );
    println!();

    let rows = [
        ("Fajr", times.fajr),
        ("Sunrise", times.sunrise),
        ("Dhuhr", times.dhuhr),
        ("Asr", times.asr),
        ("Maghrib", times.maghrib),
        ("Isha", times.isha),
    ];

    for (name, instant) in &rows {
        let time_str = format_time_in(*instant, &tz);
        let is_past = *instant < now_utc;
        if is_past {
            println_colored!(DIM, "  {:<10}  {}", name, time_str);
        } else {
            println_colored!(BOLD, "  {:<10}  {}", name, time_str);
        }
    }

    // Countdown to next prayer
    let (next, secs) = next_prayer(&provider, &observer, &times, now_utc)?;
    println!();
    println_colored!(
        AMBER,
        "  Next: {} in {}",
        next.display_name(),
        format_duration_secs(secs)
    );
    println!();
    Ok(())
}

fn next_prayer<P: PrayerTimeProvider>(
    provider: &P,
    observer: &ObserverContext,
    times: &CanonicalTimes,
    now: DateTime<Utc>,
) -> Result<(PrayerName, i64)> {
    for (name, instant) in times.ordered() {
        if instant > now {
            return Ok((name, (instant - now).num_seconds()));
        }
    }

    // All prayers passed — next is Fajr tomorrow
    let tz = resolve_timezone(&observer.timezone);
    let tomorrow = now
        .with_timezone(&tz)
        .date_naive()
        .succ_opt()
        .context("Calendar overflow")?;
    let tomorrow_times = provider.canonical_times(observer, tomorrow)?;
    Ok((PrayerName::Fajr, (tomorrow_times.fajr - now).num_seconds()))
}

// ─── Today ───────────────────────────────────────────────────────────────────

pub async fn handle_today(config: &AppConfig) -> Result<()> {
    let mut dashboard = build_dashboard(config)?;
    dashboard.refresh().await?;

    let tz = resolve_timezone(&config.observer.timezone);
    println!();
    match dashboard.schedule() {
        None => println_colored!(DIM, "  Schedule unavailable."),
        Some(schedule) if schedule.is_empty() => {
            println_colored!(DIM, "  No prayers recorded for {} yet.", schedule.day);
        }
        Some(schedule) => {
            println_colored!(
                GOLD,
                "  Prayers — {} ({})",
                location_label(config),
                schedule.day
            );
            println!();
            for slot in &schedule.slots {
                let time_str = format_time_in(slot.instant, &tz);
                let (color, label) = status_style(&slot.status);
                println_colored!(
                    color,
                    "  {:<10}  {}  {}",
                    slot.name.display_name(),
                    time_str,
                    label
                );
            }
        }
    }
    println!();
    Ok(())
}

// ─── Check ───────────────────────────────────────────────────────────────────

pub async fn handle_check(config: &AppConfig, prayer: &str) -> Result<()> {
    let name = PrayerName::from_str(prayer)?;

    let mut dashboard = build_dashboard(config)?;
    dashboard.refresh().await?;

    let Some(schedule) = dashboard.schedule() else {
        anyhow::bail!("Today's schedule could not be loaded");
    };
    if schedule.is_empty() {
        anyhow::bail!("No prayers are recorded for today yet");
    }

    let index = schedule
        .slot_index(&name)
        .context("Prayer is not in today's schedule")?;
    let slot = &schedule.slots[index];
    if slot.status != PrayerStatus::Pending {
        println_colored!(
            DIM,
            "  {} is already recorded as {}.",
            slot.name,
            slot.status.as_str()
        );
        return Ok(());
    }

    let id = slot.id.clone();
    let status = dashboard.classify_slot(index)?;
    dashboard.check_prayer(&id, status).await;
    Ok(())
}

// ─── Month ───────────────────────────────────────────────────────────────────

pub async fn handle_month(
    config: &AppConfig,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<()> {
    let local = current_time_in(&config.observer.timezone);
    let year = year.unwrap_or_else(|| local.year());
    let month = month.unwrap_or_else(|| local.month());

    let mut dashboard = build_dashboard(config)?;
    dashboard.load_month_of(year, month).await?;

    let Some(records) = dashboard.month_records() else {
        // Failure already reported through the notifier
        return Ok(());
    };

    println!();
    println_colored!(GOLD, "  Prayers — {:04}-{:02}", year, month);
    println!();

    if records.is_empty() {
        println_colored!(DIM, "  No prayers recorded this month.");
        println!();
        return Ok(());
    }

    let statuses = [
        PrayerStatus::OnTime,
        PrayerStatus::Late,
        PrayerStatus::Missed,
        PrayerStatus::Pending,
    ];
    for status in &statuses {
        let count = records.iter().filter(|r| &r.status == status).count();
        let (color, label) = status_style(status);
        println_colored!(color, "  {:<8}  {}", label, count);
    }
    println!();
    println_colored!(BOLD, "  total     {}", records.len());
    println!();
    Ok(())
}
