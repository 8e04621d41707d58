use std::cmp::Ordering;
use std::env;

// Instruction-set extensions a backend can be built on
#[derive(PartialEq, Eq, Debug)]
struct CpuFeature {
    name: &'static str,
    target_arch: &'static [&'static str],
    cfg_flag: &'static str,
    requires: Option<&'static str>,
    detected: bool,
}

impl CpuFeature {
    // Define priority order between CPU Features (Lowest number == Highest Priority)
    fn priority(&self) -> usize {
        match self.name {
            "neon" => 0,
            "sse2" => 1,
            "sse" => 2,
            _ => usize::MAX, // lowest priority by default
        }
    }

    // Groups all CPU features that gate a native specialization in this crate
    fn features() -> Vec<CpuFeature> {
        vec![
            CpuFeature {
                name: "sse",
                target_arch: &["x86", "x86_64"],
                cfg_flag: "simd_sse",
                requires: None,
                detected: false,
            },
            CpuFeature {
                name: "sse2",
                target_arch: &["x86", "x86_64"],
                cfg_flag: "simd_sse2",
                requires: Some("sse"),
                detected: false,
            },
            CpuFeature {
                name: "neon",
                target_arch: &["aarch64"],
                cfg_flag: "simd_neon",
                requires: None,
                detected: false,
            },
        ]
    }
}

impl Ord for CpuFeature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for CpuFeature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reads the features the compiler was told to target, so cross builds
// select the backend of the target rather than of the build host.
struct TargetDetector {
    arch: String,
    enabled: Vec<String>,
}

impl TargetDetector {
    fn from_env() -> Self {
        let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
        let enabled = env::var("CARGO_CFG_TARGET_FEATURE")
            .unwrap_or_default()
            .split(',')
            .map(|feature| feature.trim().to_string())
            .filter(|feature| !feature.is_empty())
            .collect();

        Self { arch, enabled }
    }

    fn detect_features(&self, features: &mut [CpuFeature]) {
        for feature in features.iter_mut() {
            feature.detected = feature.target_arch.contains(&self.arch.as_str())
                && self.enabled.iter().any(|enabled| enabled == feature.name);
        }

        // A feature is only usable when the feature it extends is usable too.
        let detected: Vec<&'static str> = features
            .iter()
            .filter(|feature| feature.detected)
            .map(|feature| feature.name)
            .collect();

        for feature in features.iter_mut() {
            if let Some(required) = feature.requires {
                feature.detected &= detected.contains(&required);
            }
        }
    }
}

fn disable(features: &mut [CpuFeature], name: &str) {
    for feature in features.iter_mut().filter(|feature| feature.name == name) {
        feature.detected = false;
    }
}

fn apply(features: &mut [CpuFeature]) {
    // Sort features by priority (highest first)
    features.sort();

    let mut applied = Vec::new();
    for feature in features.iter().filter(|feature| feature.detected) {
        println!("cargo:rustc-cfg={}", feature.cfg_flag);
        applied.push(feature.cfg_flag);
    }

    // if no feature is detected, every (type, width) uses the fallback implementation
    if applied.is_empty() {
        println!("cargo:rustc-cfg=simd_fallback");
        applied.push("simd_fallback");
    }

    println!("cargo:rustc-env=LANEWISE_BACKENDS={}", applied.join(","));

    println!("cargo::rustc-check-cfg=cfg(simd_sse)");
    println!("cargo::rustc-check-cfg=cfg(simd_sse2)");
    println!("cargo::rustc-check-cfg=cfg(simd_neon)");
    println!("cargo::rustc-check-cfg=cfg(simd_fallback)");
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=CARGO_CFG_TARGET_FEATURE");

    let mut features = CpuFeature::features();

    TargetDetector::from_env().detect_features(&mut features);

    if env::var_os("CARGO_FEATURE_NO_SSE2").is_some() {
        disable(&mut features, "sse2");
    }

    if env::var_os("CARGO_FEATURE_FORCE_FALLBACK").is_some() {
        for feature in features.iter_mut() {
            feature.detected = false;
        }
    }

    apply(&mut features);
}
