//! Kernel coefficients shared by every backend.
//!
//! The scalar reference kernels and the native kernels read the same
//! constants and evaluate them in the same order, so a backend only changes
//! how many lanes are computed at once, never the arithmetic.

/// Single-precision coefficients (Cephes `sinf`/`cosf`/`expf`/`logf`).
pub mod f32 {
    /// 4 / π
    pub const FOPI: f32 = 1.273_239_544_735_16;

    /// π/4 split in three parts, `DP1 + DP2 + DP3 ≈ π/4`.
    pub const DP1: f32 = 0.785_156_25;
    pub const DP2: f32 = 2.418_756_484_985_351_562_5e-4;
    pub const DP3: f32 = 3.774_894_977_445_941_08e-8;

    pub const SIN_P0: f32 = -1.951_529_589_1e-4;
    pub const SIN_P1: f32 = 8.332_160_873_6e-3;
    pub const SIN_P2: f32 = -1.666_665_461_1e-1;

    pub const COS_P0: f32 = 2.443_315_711_809_948e-5;
    pub const COS_P1: f32 = -1.388_731_625_493_765e-3;
    pub const COS_P2: f32 = 4.166_664_568_298_827e-2;

    /// Largest `f32` whose exponential is finite, just below `ln(f32::MAX)`.
    /// Inputs above this overflow to `+inf`.
    pub const EXP_HI: f32 = 88.722_83;
    /// `ln(2^-150)`: inputs below this round to zero.
    pub const EXP_LO: f32 = -103.972_08;
    /// Bounds of the first `2^n` factor. Inside them `y * 2^n` stays
    /// normal; the rest of `n` is applied as a second factor.
    pub const EXP_N_MAX: f32 = 127.0;
    pub const EXP_N_MIN: f32 = -125.0;

    pub const LOG2E: f32 = std::f32::consts::LOG2_E;

    /// ln 2 split as `C1 + C2`, with `C1` exact in a few mantissa bits.
    pub const EXP_C1: f32 = 0.693_359_375;
    pub const EXP_C2: f32 = -2.121_944_4e-4;

    pub const EXP_P0: f32 = 1.987_569_150_0e-4;
    pub const EXP_P1: f32 = 1.398_199_950_7e-3;
    pub const EXP_P2: f32 = 8.333_451_907_3e-3;
    pub const EXP_P3: f32 = 4.166_579_589_4e-2;
    pub const EXP_P4: f32 = 1.666_666_545_9e-1;
    pub const EXP_P5: f32 = 5.000_000_120_1e-1;

    pub const SQRTHF: f32 = std::f32::consts::FRAC_1_SQRT_2;

    pub const LOG_P0: f32 = 7.037_683_629_2e-2;
    pub const LOG_P1: f32 = -1.151_461_031_0e-1;
    pub const LOG_P2: f32 = 1.167_699_874_0e-1;
    pub const LOG_P3: f32 = -1.242_014_084_6e-1;
    pub const LOG_P4: f32 = 1.424_932_278_7e-1;
    pub const LOG_P5: f32 = -1.666_805_766_5e-1;
    pub const LOG_P6: f32 = 2.000_071_476_5e-1;
    pub const LOG_P7: f32 = -2.499_999_399_3e-1;
    pub const LOG_P8: f32 = 3.333_333_117_4e-1;

    /// ln 2 split as `Q2 + Q1` (Cephes `logf`).
    pub const LOG_Q1: f32 = -2.121_944_40e-4;
    pub const LOG_Q2: f32 = 0.693_359_375;

    pub const SIGN_MASK: u32 = 0x8000_0000;
    pub const EXP_MASK: u32 = 0x7F80_0000;
    pub const MANTISSA_BITS: u32 = 23;
    pub const EXP_BIAS: i32 = 127;
    /// Bit pattern of `0.5`.
    pub const HALF_BITS: u32 = 0x3F00_0000;
    /// `2^23`: lifts every positive subnormal into the normal range.
    pub const SUBNORMAL_SCALE: f32 = 8_388_608.0;
    pub const SUBNORMAL_SHIFT: f32 = 23.0;
}

/// Double-precision coefficients (Cephes `sin`/`cos`, Taylor `exp`, atanh `log`).
pub mod f64 {
    /// 4 / π
    pub const FOPI: f64 = 1.273_239_544_735_162_7;

    /// π/4 split in three parts, `DP1 + DP2 + DP3 ≈ π/4`.
    pub const DP1: f64 = 7.853_981_256_484_985_351_56e-1;
    pub const DP2: f64 = 3.774_894_707_930_798_176_68e-8;
    pub const DP3: f64 = 2.695_151_429_079_059_526_45e-15;

    pub const SIN_P0: f64 = 1.589_623_015_765_465_680_60e-10;
    pub const SIN_P1: f64 = -2.505_074_776_285_780_728_66e-8;
    pub const SIN_P2: f64 = 2.755_731_362_138_572_452_45e-6;
    pub const SIN_P3: f64 = -1.984_126_982_958_953_859_96e-4;
    pub const SIN_P4: f64 = 8.333_333_333_322_118_588_78e-3;
    pub const SIN_P5: f64 = -1.666_666_666_666_663_072_95e-1;

    pub const COS_P0: f64 = -1.135_853_652_138_768_173_00e-11;
    pub const COS_P1: f64 = 2.087_570_084_197_473_167_78e-9;
    pub const COS_P2: f64 = -2.755_731_417_929_673_881_12e-7;
    pub const COS_P3: f64 = 2.480_158_728_885_170_453_48e-5;
    pub const COS_P4: f64 = -1.388_888_888_887_305_641_16e-3;
    pub const COS_P5: f64 = 4.166_666_666_666_659_292_18e-2;

    /// `ln(f64::MAX)`: inputs above this overflow to `+inf`.
    pub const EXP_HI: f64 = 709.782_712_893_384;
    /// `ln(2^-1075)`: inputs below this round to zero.
    pub const EXP_LO: f64 = -745.133_219_101_941_1;
    /// Bounds of the first `2^n` factor.
    pub const EXP_N_MAX: f64 = 1023.0;
    pub const EXP_N_MIN: f64 = -1021.0;

    pub const LOG2E: f64 = std::f64::consts::LOG2_E;

    /// ln 2 split as `C1 + C2` (Cephes `exp`).
    pub const EXP_C1: f64 = 6.931_457_519_531_25e-1;
    pub const EXP_C2: f64 = 1.428_606_820_309_417_232_12e-6;

    /// `1/13!` down to `1/2!`.
    pub const EXP_TAYLOR: [f64; 12] = [
        1.605_904_383_682_161_5e-10,
        2.087_675_698_786_81e-9,
        2.505_210_838_544_172e-8,
        2.755_731_922_398_589_3e-7,
        2.755_731_922_398_589_3e-6,
        2.480_158_730_158_730_2e-5,
        1.984_126_984_126_984e-4,
        1.388_888_888_888_889e-3,
        8.333_333_333_333_333e-3,
        4.166_666_666_666_666_4e-2,
        1.666_666_666_666_666_6e-1,
        0.5,
    ];

    pub const SQRTHF: f64 = std::f64::consts::FRAC_1_SQRT_2;

    /// `1/19` down to `1/3`: odd terms of `atanh(y) / y` in `y²`.
    pub const LOG_ATANH: [f64; 9] = [
        1.0 / 19.0,
        1.0 / 17.0,
        1.0 / 15.0,
        1.0 / 13.0,
        1.0 / 11.0,
        1.0 / 9.0,
        1.0 / 7.0,
        1.0 / 5.0,
        1.0 / 3.0,
    ];

    /// ln 2 split as `LN2_HI + LN2_LO` (fdlibm).
    pub const LN2_HI: f64 = 6.931_471_803_691_238e-1;
    pub const LN2_LO: f64 = 1.908_214_929_270_587_7e-10;

    pub const SIGN_MASK: u64 = 0x8000_0000_0000_0000;
    pub const EXP_MASK: u64 = 0x7FF0_0000_0000_0000;
    pub const MANTISSA_BITS: u32 = 52;
    pub const EXP_BIAS: i64 = 1023;
    /// Bit pattern of `0.5`.
    pub const HALF_BITS: u64 = 0x3FE0_0000_0000_0000;
    /// `2^52`: lifts every positive subnormal into the normal range.
    pub const SUBNORMAL_SCALE: f64 = 4_503_599_627_370_496.0;
    pub const SUBNORMAL_SHIFT: f64 = 52.0;
}
