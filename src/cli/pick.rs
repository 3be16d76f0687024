//! Pick command handler
//!
//! Shows the candidate a map click at the given coordinates produces.

use crate::config::Config;
use crate::coord::gcj02::gcj02_to_wgs84;
use crate::coord::{CoordinateSystem, Coordinates};
use crate::error::Result;
use crate::geo::SearchResult;
use clap::Args;

/// Pick command arguments
#[derive(Args)]
pub struct PickArgs {
    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Input is WGS-84 (raw GPS) rather than GCJ-02
    #[arg(long)]
    pub wgs84: bool,
}

/// Run the pick command
pub fn run(args: PickArgs) -> Result<()> {
    let config = Config::load()?;

    let coords = Coordinates::new(args.lat, args.lng);
    coords.validate()?;

    let system = if args.wgs84 {
        CoordinateSystem::Wgs84
    } else {
        CoordinateSystem::Gcj02
    };
    let result = SearchResult::from_map_click(system.to_gcj02(coords));

    println!("{}", result.name);
    println!("  {}", result.address);
    println!("  WGS-84: {}", gcj02_to_wgs84(result.coords()).label());
    println!(
        "  {}",
        config.format_url(None, result.lat, result.lng, &result.name)?
    );

    Ok(())
}
