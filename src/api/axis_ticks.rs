pub(super) const AXIS_MIN_PRICE_TICKS: usize = 2;
pub(super) const AXIS_MAX_PRICE_TICKS: usize = 12;

pub(super) fn axis_tick_target_count(
    axis_span_px: f64,
    target_spacing_px: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return min_ticks;
    }

    let raw = (axis_span_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks)
}

/// Rounds `raw_step` up to the nearest 1, 2 or 5 times a power of ten.
pub(super) fn nice_step(raw_step: f64) -> f64 {
    if !raw_step.is_finite() || raw_step <= 0.0 {
        return 0.0;
    }
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;
    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Multiples of a nice step inside `domain`, ascending.
pub(super) fn price_ticks(domain: (f64, f64), tick_count: usize) -> (Vec<f64>, f64) {
    let (low, high) = (domain.0.min(domain.1), domain.0.max(domain.1));
    let span = high - low;
    if tick_count < 2 || !span.is_finite() || span <= 0.0 {
        return (Vec::new(), 0.0);
    }

    let step = nice_step(span / (tick_count - 1) as f64);
    if step <= 0.0 {
        return (Vec::new(), 0.0);
    }
    let first = (low / step).ceil() as i64;
    let last = (high / step).floor() as i64;
    let ticks = (first..=last).map(|index| index as f64 * step).collect();
    (ticks, step)
}

/// Fraction digits needed to tell neighbouring ticks apart.
pub(super) fn price_label_decimals(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 || step >= 1.0 {
        return 0;
    }
    (-step.log10().floor()) as usize
}

/// Keeps ticks at least `min_spacing_px` apart, scanning left to right.
///
/// The last tick wins over its predecessor when both cannot fit, so the most
/// recent candle day stays labelled.
pub(super) fn select_ticks_with_min_spacing<T: Copy>(
    mut ticks: Vec<(T, f64)>,
    min_spacing_px: f64,
) -> Vec<(T, f64)> {
    ticks.sort_by(|left, right| left.1.total_cmp(&right.1));
    if ticks.len() <= 1 || !min_spacing_px.is_finite() || min_spacing_px <= 0.0 {
        return ticks;
    }

    let mut selected: Vec<(T, f64)> = Vec::with_capacity(ticks.len());
    for tick in ticks.iter().copied() {
        match selected.last() {
            Some(last) if tick.1 - last.1 < min_spacing_px => {}
            _ => selected.push(tick),
        }
    }

    let last_tick = ticks[ticks.len() - 1];
    let selected_len = selected.len();
    if selected[selected_len - 1].1 != last_tick.1 {
        if selected_len == 1 {
            selected[0] = last_tick;
        } else if last_tick.1 - selected[selected_len - 2].1 >= min_spacing_px {
            selected[selected_len - 1] = last_tick;
        }
    }
    selected
}
