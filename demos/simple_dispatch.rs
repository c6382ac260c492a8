//! 簡單派車示例：一個區域、兩台車、三種油品

use anyhow::Context;
use chrono::NaiveDate;
use fleet::{optimize_fleet, FleetOptimizer, Order, ProductId, Truck};
use rust_decimal::Decimal;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    println!("=== 簡單派車示例 ===\n");

    // 車隊
    let trucks = vec![
        Truck::try_with_capacities(
            "ABC-1234",
            &[Decimal::from(10000), Decimal::from(5000), Decimal::from(3000)],
        )?,
        Truck::try_with_capacities("XYZ-5678", &[Decimal::from(8000), Decimal::from(4000)])?,
    ];

    // 已付款訂單（油品代碼在接收時正規化）
    let raw_orders = [
        ("ORD-001", "diesel", 6000),
        ("ORD-002", "Diesel", 4000),
        ("ORD-003", "sp-95", 5000),
        ("ORD-004", "heating oil", 3000),
        ("ORD-005", "SP95", 2500),
    ];
    let orders = raw_orders
        .iter()
        .map(|(number, code, quantity)| {
            let product = ProductId::canonicalize(code)
                .with_context(|| format!("訂單 {} 油品代碼無效", number))?;
            Ok(Order::try_new("TAIPEI", product, Decimal::from(*quantity))?.with_order_number(*number))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    println!("訂單清單:");
    for order in &orders {
        println!(
            "  - {}: {} {} 公升",
            order.order_number.as_deref().unwrap_or("-"),
            order.product,
            order.quantity()
        );
    }

    let result = optimize_fleet(&trucks, &orders);

    println!("\n裝載結果:");
    for truck in result.loaded_trucks() {
        println!(
            "  車輛 {} → 區域 {}，裝載率 {}%",
            truck.license_plate,
            truck.assigned_zone().unwrap_or("-"),
            truck.fill_rate().round_dp(1)
        );
        for (i, compartment) in truck.compartments().iter().enumerate() {
            let product = compartment
                .product_id()
                .map(|p| p.to_string())
                .unwrap_or_else(|| "(空)".to_string());
            println!(
                "    隔艙 {}: {} {}/{}",
                i + 1,
                product,
                compartment.current_load(),
                compartment.capacity()
            );
        }
    }

    println!("\n整體裝載率: {}%", result.fill_rate.round_dp(1));
    println!("總運量: {}", result.total_volume_moved);
    println!("剩餘訂單: {} 筆", result.remaining_orders.len());

    let date = NaiveDate::from_ymd_opt(2025, 11, 1).context("無效的日期")?;
    for plan in FleetOptimizer::loading_plans(&result, date) {
        println!("\n裝載計劃 {}:\n{}", plan.license_plate, plan.to_json()?);
    }

    Ok(())
}
