//! 卡方分布（1 个自由度）的尾概率

/// 互补误差函数
///
/// Chebyshev 拟合，全定义域相对误差小于 1.2e-7
pub fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -1.26551223
        + t * (1.00002368
            + t * (0.37409196
                + t * (0.09678418
                    + t * (-0.18628806
                        + t * (0.27886807
                            + t * (-1.13520398
                                + t * (1.48851587 + t * (-0.82215223 + t * 0.17087277))))))));
    let ans = t * (-z * z + poly).exp();
    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}

/// P(X >= statistic)，X ~ χ²(1)
///
/// 负值按绝对值处理
pub fn chi_square_sf_1dof(statistic: f64) -> f64 {
    let g = statistic.abs();
    if !g.is_finite() {
        return 0.0;
    }
    erfc((g / 2.0).sqrt()).clamp(0.0, 1.0)
}
