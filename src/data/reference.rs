//! Theoretical waveforms the experimental profiles are compared against.
//!
//! Both are simulated responses stored at 128 samples: a saturating pulse
//! and a slow rise-and-decay. They are kept unnormalised, exactly as
//! produced by the model, and go through the same min-max step as the
//! averaged dumps.

use super::model::ProfileSet;

/// Saturating pulse: rises to the detector ceiling, holds, then decays.
pub const SATURATED_PULSE: [f64; 128] = [
    1030.5, 1021.2, 1014.6, 1092.7, 1057.9, 1028.1, 1120.0, 1255.9, 1258.5, 1262.3, 1241.9,
    1276.5, 1233.7, 1316.5, 1381.5, 1400.1, 1429.3, 1432.7, 1555.8, 1606.0, 1615.2, 1610.4,
    1921.6, 2016.6, 2169.1, 2189.5, 2244.9, 2632.3, 2857.8, 3062.0, 3654.4, 3938.3, 3938.1,
    3937.4, 3938.3, 3937.3, 3938.7, 3939.2, 3937.9, 3938.0, 3937.5, 3938.0, 3938.2, 3938.9,
    3938.1, 3938.3, 3937.1, 3938.0, 3937.1, 3938.6, 3937.5, 3938.6, 3937.6, 3939.2, 3937.9,
    3938.8, 3938.4, 3938.3, 3939.1, 3938.5, 3938.7, 3936.7, 3938.6, 3937.1, 3938.1, 3936.8,
    3938.1, 3937.2, 3938.4, 3937.3, 3938.9, 3937.8, 3938.1, 3937.7, 3937.9, 3937.9, 3938.1,
    3938.6, 3938.6, 3937.7, 3937.5, 3937.9, 3937.9, 3881.9, 3408.5, 2639.0, 2404.8, 2254.7,
    2124.0, 1894.6, 1877.3, 1595.9, 1462.6, 1440.4, 1505.4, 1372.7, 1305.5, 1214.2, 1220.5,
    1213.3, 1155.9, 1222.4, 1166.9, 1117.7, 1107.5, 1030.9, 1049.6, 1059.2, 1059.5, 1078.4,
    1044.5, 913.4, 990.3, 923.0, 909.8, 921.6, 949.0, 929.7, 945.1, 892.3, 877.8, 954.1, 900.6,
    855.7, 940.8, 868.7, 873.5, 824.8,
];

/// Slow rise peaking mid-window, then a gradual decay.
pub const SLOW_RESPONSE: [f64; 128] = [
    685.4, 698.5666666666667, 686.9333333333333, 698.7, 696.8333333333334, 694.0, 714.2, 710.2,
    713.6666666666666, 719.6333333333333, 720.4, 723.8, 735.8666666666667, 726.9666666666667,
    743.4333333333333, 733.0666666666667, 759.7, 745.7666666666667, 775.0333333333333, 765.6,
    759.6, 753.8333333333334, 784.0333333333333, 733.2666666666667, 778.3333333333334,
    763.9333333333333, 780.3, 740.4, 754.4, 772.1, 765.8333333333334, 798.3, 828.5666666666667,
    791.5333333333333, 828.2666666666667, 806.5666666666667, 798.9666666666667,
    832.4333333333333, 809.7333333333333, 758.0666666666667, 769.0333333333333,
    816.8666666666667, 838.2, 845.9, 830.3, 837.2, 831.5666666666667, 844.7, 851.2333333333333,
    832.6, 852.7666666666667, 822.4333333333333, 837.9333333333333, 825.5, 836.3,
    830.7666666666667, 843.5, 833.7333333333333, 823.7333333333333, 807.7, 836.7,
    868.2333333333333, 828.9333333333333, 835.2, 822.9666666666667, 819.8333333333334, 765.6,
    839.1666666666666, 824.6, 742.3666666666667, 779.9333333333333, 820.7333333333333,
    813.5666666666667, 810.7, 801.0333333333333, 801.7333333333333, 786.6, 803.8, 754.1, 749.4,
    787.2666666666667, 789.4333333333333, 771.0666666666667, 768.0333333333333,
    728.3333333333334, 703.0666666666667, 761.0333333333333, 743.4, 738.2666666666667,
    735.4666666666667, 735.8666666666667, 735.8666666666667, 738.5333333333333,
    726.4666666666667, 730.2, 716.1666666666666, 716.3333333333334, 675.5666666666667,
    707.8666666666667, 691.6, 673.6333333333333, 691.4, 677.9333333333333, 670.9333333333333,
    669.8666666666667, 656.2333333333333, 662.8, 658.2666666666667, 656.6, 650.2666666666667,
    653.6666666666666, 629.0, 642.8333333333334, 635.9333333333333, 629.4333333333333, 628.7,
    624.1666666666666, 599.4333333333333, 588.6, 600.2, 598.3666666666667, 573.4666666666667,
    596.6, 584.0666666666667, 579.5, 570.7, 553.0, 573.0666666666667,
];

/// The builtin reference collection, in comparison order, sampled at `len`
/// points.
///
/// The waveforms are stored at 128 points. Any other length is produced by
/// linear interpolation over the same time span, so both endpoints are kept.
pub fn builtin(len: usize) -> ProfileSet {
    ProfileSet::from_arrays(
        "theoretical",
        vec![resample(&SATURATED_PULSE, len), resample(&SLOW_RESPONSE, len)],
    )
}

/// Linear interpolation of `values` onto `len` evenly spaced points.
pub fn resample(values: &[f64], len: usize) -> Vec<f64> {
    if len == values.len() || values.len() < 2 {
        return values.iter().copied().cycle().take(len).collect();
    }
    if len == 1 {
        return vec![values[0]];
    }

    let last = values.len() - 1;
    let step = last as f64 / (len - 1) as f64;
    (0..len)
        .map(|i| {
            if i == len - 1 {
                return values[last];
            }
            let pos = i as f64 * step;
            let lo = (pos.floor() as usize).min(last);
            let hi = (lo + 1).min(last);
            let frac = pos - lo as f64;
            values[lo] + (values[hi] - values[lo]) * frac
        })
        .collect()
}
