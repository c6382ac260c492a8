//! 區域車隊示例：隨機產生多區域訂單與車隊，比較不同配置的結果
//!
//! 執行：RUST_LOG=debug cargo run --example regional_fleet

use fleet::{FleetOptimizer, OptimizationResult, OptimizerConfig, Order, OrderStatus, ProductId, Truck};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use tracing_subscriber::{fmt, EnvFilter};

const ZONES: [&str; 5] = ["NORTH", "SOUTH", "EAST", "WEST", "CENTRAL"];
const PRODUCTS: [&str; 4] = ["DIESEL", "SP95", "SP98", "HEATING_OIL"];

fn generate_fleet(rng: &mut StdRng, count: usize) -> anyhow::Result<Vec<Truck>> {
    (0..count)
        .map(|i| {
            let compartments = rng.gen_range(2..=4);
            let capacities: Vec<Decimal> = (0..compartments)
                .map(|_| Decimal::from(rng.gen_range(3..=12) * 1000))
                .collect();
            Ok(Truck::try_with_capacities(format!("TRK-{:03}", i + 1), &capacities)?)
        })
        .collect()
}

fn generate_orders(rng: &mut StdRng, count: usize) -> anyhow::Result<Vec<Order>> {
    (0..count)
        .map(|i| {
            let zone = ZONES[rng.gen_range(0..ZONES.len())];
            let product = ProductId::new(PRODUCTS[rng.gen_range(0..PRODUCTS.len())])?;
            let quantity = Decimal::from(rng.gen_range(10..=90) * 100);
            // 約一成訂單尚未付款
            let status = if rng.gen_bool(0.1) {
                OrderStatus::Pending
            } else {
                OrderStatus::Paid
            };
            Ok(Order::try_new(zone, product, quantity)?
                .with_order_number(format!("SO-{:04}", i + 1))
                .with_priority(rng.gen_range(1..=5))
                .with_status(status))
        })
        .collect()
}

fn summarize(label: &str, result: &OptimizationResult) {
    println!("\n--- {} ---", label);
    println!(
        "出車 {} 台，總運量 {}，整體裝載率 {}%",
        result.loaded_trucks().count(),
        result.total_volume_moved,
        result.fill_rate.round_dp(1)
    );
    for report in &result.zone_reports {
        println!(
            "  {:<8} 需求 {:>7}  裝載 {:>7}  方案 {:>2}  出車 {:>2}",
            report.zone,
            report.demand,
            report.loaded_volume,
            report.plans_generated,
            report.trucks_dispatched
        );
    }
    for (zone, trucks) in &result.utilization_by_zone {
        println!("  {} 使用車輛 {} 台", zone, trucks);
    }
    for warning in &result.warnings {
        println!("  警告: {}", warning);
    }
    println!(
        "  剩餘訂單 {} 筆，共 {}",
        result.remaining_orders.len(),
        result.remaining_volume()
    );
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_line_number(true).init();

    println!("=== 區域車隊示例 ===");

    let mut rng = StdRng::seed_from_u64(2025);
    let trucks = generate_fleet(&mut rng, 12)?;
    let orders = generate_orders(&mut rng, 60)?;
    tracing::info!("產生車輛 {} 台、訂單 {} 筆", trucks.len(), orders.len());

    let default = FleetOptimizer::default().optimize(&trucks, &orders);
    summarize("預設配置", &default);

    // 放寬門檻並擴大組合搜尋
    let relaxed = OptimizerConfig::new()
        .with_min_plan_fill_rate(Decimal::from(30))
        .with_max_combination_size(5)
        .with_max_passes(4);
    let relaxed = FleetOptimizer::try_new(relaxed)?.optimize(&trucks, &orders);
    summarize("放寬門檻", &relaxed);

    // 配置也可由 JSON 載入，缺少的欄位使用預設值
    let strict = OptimizerConfig::from_json(r#"{ "min_plan_fill_rate": 80, "max_trucks_per_zone": 3 }"#)?;
    let strict = FleetOptimizer::try_new(strict)?.optimize(&trucks, &orders);
    summarize("嚴格門檻", &strict);

    Ok(())
}
