//! # Fleet
//!
//! 油罐車隔艙裝載優化：把已付款的液態燃料訂單分派到多隔艙油罐車上，
//! 每個隔艙只裝一種油品，每台車只跑一個配送區域。
//!
//! ```no_run
//! use fleet::{optimize_fleet, Order, ProductId, Truck};
//! use rust_decimal::Decimal;
//!
//! let trucks = vec![Truck::with_capacities("ABC-123", &[Decimal::from(5000), Decimal::from(3000)])];
//! let orders = vec![Order::new("NORTH", ProductId::new("DIESEL").unwrap(), Decimal::from(8000))];
//!
//! let result = optimize_fleet(&trucks, &orders);
//! println!("裝載率 {}%", result.fill_rate);
//! ```

pub use fleet_calc::{
    CombinationSearch, CompartmentFiller, FillOutcome, OrderCombination, Pick, ProductGroup,
    ProductVolume, RankedTruck, TruckScore, TruckScorer, ZoneAggregator, ZoneAnalysis, ZoneGroup,
};
pub use fleet_core::{
    percentage, Compartment, CompartmentPlan, FleetError, LoadingPlan, OptimizerConfig, Order,
    OrderLoad, OrderStatus, ProductId, Result, ScoringRules, Truck, TruckStatus, PERCENT,
};
pub use fleet_optimizer::{
    optimize_fleet, AllocationPlan, AllocationPlanner, FleetOptimizer, OptimizationResult,
    OptimizationWarning, ZoneReport,
};
