//! Prints which backend every vector alias resolved to in this build, then
//! runs the reference scenarios through the default vector types.
//!
//! ```text
//! RUST_LOG=debug cargo run --release --bin lanewise-report
//! ```

use lanewise::simd::{
    BackendReport, Bool32, Bool32x4, F32x4, F64x2, SimdFloat, SimdMask, SimdVector,
};
use log::info;

fn main() {
    env_logger::init();

    let report = BackendReport::collect();
    report.log();

    println!("Backends ({} of {} aliases native)", report.native_count(), report.entries.len());
    for entry in &report.entries {
        println!("  {entry}");
    }

    let x = F32x4::splat(1.2);
    let (sin, cos) = x.sincos();
    println!();
    println!("sincos(1.2)      = ({:.6}, {:.6})", sin.extract(0), cos.extract(0));
    println!("exp(log(1.2))    = {:.6}", x.log().exp().extract(0));
    println!(
        "pow(2.0, 10.0)   = {:.3}",
        F64x2::splat(2.0).pow(F64x2::splat(10.0)).extract(0)
    );

    let pattern = [Bool32::TRUE, Bool32::FALSE, Bool32::TRUE, Bool32::FALSE];
    let mask = Bool32x4::from_slice(&pattern);
    let cleared = mask ^ mask;
    println!(
        "mask ^ mask      = {:#06b} (bitmask of {:#06b})",
        cleared.bitmask(),
        mask.bitmask()
    );

    info!(
        "scenario check: |sin - 0.932| = {:.2e}, |cos - 0.362| = {:.2e}",
        (sin.extract(0) - 0.932).abs(),
        (cos.extract(0) - 0.362).abs()
    );
}
