// Forbid unwrap() in production code to prevent panics from bad input.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use std::fmt::Write;

use indexkey::layout::{KeyLayout, LayoutIdentifier};
use indexkey::spatial::{CoordinateReferenceSystem, PointValue, SpaceFillingCurve};
use indexkey::temporal::{Temporal, TimeFields, TimeUnit, TimeValue};
use indexkey::time::SystemTimeSource;
use indexkey::{IndexConfig, IndexKey, IndexValue, LayoutKey, LayoutRegistry};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage:
  indexkey layouts                     list registered layouts
  indexkey decode <hex-identifier>     unpack a persisted layout identifier
  indexkey curve <crs> <x> <y> [z]     curve ordinate and cell of a point
  indexkey time <text> [unit]          parse a time, optionally truncate it, show its key";

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "indexkey=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration from environment variables
    let config = match IndexConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.first().map(String::as_str) {
        Some("layouts") => list_layouts(&config),
        Some("decode") => decode_identifier(&args[1..]),
        Some("curve") => curve_position(&config, &args[1..]),
        Some("time") => time_key(&config, &args[1..]),
        _ => Err(USAGE.to_string()),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn list_layouts(config: &IndexConfig) -> Result<(), String> {
    let registry = LayoutRegistry::new(config).map_err(|e| e.to_string())?;
    for (key, layout) in registry.layouts() {
        let identifier = layout.identifier();
        println!(
            "{:<28} {:<5} {:>4} bytes  v{}.{}  {:#018x}  settings {:#010x}",
            key.to_string(),
            identifier.tag(),
            identifier.key_size(),
            identifier.major(),
            identifier.minor(),
            identifier.word(),
            layout.settings_fingerprint()
        );
    }
    Ok(())
}

fn decode_identifier(args: &[String]) -> Result<(), String> {
    let [hex] = args else {
        return Err(USAGE.to_string());
    };
    let digits = hex.trim_start_matches("0x").trim_start_matches("0X");
    let word = u64::from_str_radix(digits, 16).map_err(|e| format!("'{hex}' is not hex: {e}"))?;
    let identifier = LayoutIdentifier::from_word(word).map_err(|e| e.to_string())?;
    println!("tag      {}", identifier.tag());
    println!("key size {}", identifier.key_size());
    println!("version  {}.{}", identifier.major(), identifier.minor());
    Ok(())
}

fn curve_position(config: &IndexConfig, args: &[String]) -> Result<(), String> {
    let Some((name, coords)) = args.split_first() else {
        return Err(USAGE.to_string());
    };
    let crs = CoordinateReferenceSystem::from_name(name)
        .or_else(|_| {
            name.parse::<u32>()
                .map_err(|e| e.to_string())
                .and_then(|code| {
                    CoordinateReferenceSystem::from_code(code).map_err(|e| e.to_string())
                })
        })
        .map_err(|_| format!("unknown coordinate reference system: {name}"))?;
    let coords = coords
        .iter()
        .map(|c| c.parse::<f64>().map_err(|e| format!("'{c}' is not a number: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    let point = PointValue::new(crs, &coords).map_err(|e| e.to_string())?;

    let registry = LayoutRegistry::new(config).map_err(|e| e.to_string())?;
    let layout = registry
        .get(LayoutKey::Spatial { crs, unique: false })
        .ok_or_else(|| format!("no spatial layout for {crs}"))?;
    let spatial = layout
        .as_spatial()
        .ok_or_else(|| format!("no spatial layout for {crs}"))?;
    let curve = spatial.curve();
    let ordinate = point.curve_ordinate(curve).map_err(|e| e.to_string())?;
    let cell = curve.cell_envelope(ordinate);

    println!("point    {point}");
    println!("ordinate {ordinate} ({ordinate:#018x})");
    println!("cell     {:?} .. {:?}", cell.min(), cell.max());
    println!("levels   {}", curve.levels());
    Ok(())
}

fn time_key(config: &IndexConfig, args: &[String]) -> Result<(), String> {
    let (text, unit) = match args {
        [text] => (text, None),
        [text, unit] => {
            let unit = TimeUnit::from_name(unit).ok_or_else(|| format!("unknown unit: {unit}"))?;
            (text, Some(unit))
        }
        _ => return Err(USAGE.to_string()),
    };
    // Times without an offset take INDEXKEY_DEFAULT_TIMEZONE
    let mut time =
        TimeValue::parse(text, config, &SystemTimeSource).map_err(|e| e.to_string())?;
    if let Some(unit) = unit {
        time = TimeValue::truncate(
            unit,
            &Temporal::Time(time),
            &TimeFields::new(),
            config,
            &SystemTimeSource,
        )
        .map_err(|e| e.to_string())?;
    }

    let registry = LayoutRegistry::new(config).map_err(|e| e.to_string())?;
    let layout = registry
        .get(LayoutKey::Temporal { unique: true })
        .ok_or_else(|| "no temporal layout registered".to_string())?;
    let mut key = vec![0u8; layout.key_size()];
    layout
        .encode(&IndexKey::new(IndexValue::Time(time), 0), &mut key)
        .map_err(|e| e.to_string())?;
    let hex = key.iter().fold(String::new(), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    });

    println!("time     {time}");
    println!("instant  {} ns after 00:00Z", time.utc_nanos_of_day());
    println!("key      {hex}");
    Ok(())
}
