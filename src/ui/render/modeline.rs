use crate::filter::MatchMode;
use crate::ui::model::{DEFAULT_WIDTH, Model};
use crate::ui::render::styles::STYLE_MODELINE;
use lipgloss::Color;

fn key_hints(m: &Model) -> Vec<(&'static str, &'static str)> {
    let esc = if m.ctl.is_opened() { "close" } else { "quit" };
    vec![
        ("↑↓", "move"),
        ("⏎", "apply"),
        ("⇥", "commit"),
        ("^U", "clear"),
        ("⎋", esc),
    ]
}

// position of the highlighted entry, e.g. "3/12"
fn position(m: &Model) -> String {
    let total = m.ctl.display_list().len();
    match m.ctl.highlighted_index() {
        Some(i) if m.ctl.is_opened() && total > 0 => format!("{}/{}", i + 1, total),
        _ if m.ctl.is_opened() => format!("{total}"),
        _ => String::new(),
    }
}

pub fn render_modeline(m: &Model, inner_max: usize, mode: &str) -> String {
    // prepare inner styles without padding so spacing is under our control
    let inner_style = STYLE_MODELINE.clone().padding(0, 0, 0, 0);
    let key_style = STYLE_MODELINE
        .clone()
        .foreground(Color::from_rgb(238, 0, 238))
        .bold(true)
        .padding(0, 0, 0, 0);
    let desc_style = STYLE_MODELINE.clone().padding(0, 0, 0, 0);
    let pos_style = STYLE_MODELINE.clone().faint(true).padding(0, 0, 0, 0);

    // Build rendered pairs and their plain widths in one pass
    let pairs: Vec<(String, usize)> = key_hints(m)
        .iter()
        .map(|(k, d)| {
            let plain_len = d.chars().count() + 1 + k.chars().count();
            let rendered = format!(
                "{}{}{}",
                desc_style.render(d),
                inner_style.render(":"),
                key_style.render(k)
            );
            (rendered, plain_len)
        })
        .collect();
    let pair_sep_rendered = inner_style.render("  ");
    let pair_sep_width = 2usize;

    // status takes precedence over the position counter
    let right_plain = if m.status.is_empty() {
        position(m)
    } else {
        m.status.clone()
    };
    let mut right_width = right_plain.chars().count();
    let mut right_rendered = pos_style.render(&right_plain);

    let mode_w = mode.chars().count() + 2;
    let sep_w = " | ".chars().count();
    let avail = inner_max.saturating_sub(mode_w + sep_w);

    // drop rightmost pairs until left + right fits into avail
    let width_of = |n: usize| -> usize {
        if n == 0 {
            0
        } else {
            pairs.iter().take(n).map(|(_, w)| *w).sum::<usize>() + pair_sep_width * (n - 1)
        }
    };
    let mut pairs_count = pairs.len();
    while pairs_count > 0 && width_of(pairs_count) + right_width > avail {
        pairs_count -= 1;
    }
    let left_width = width_of(pairs_count);
    let left_rendered = pairs
        .iter()
        .take(pairs_count)
        .map(|(r, _)| r.clone())
        .collect::<Vec<_>>()
        .join(&pair_sep_rendered);

    // still too wide: drop the right-hand text
    if left_width + right_width > avail {
        right_width = 0;
        right_rendered.clear();
    }

    let pad = avail.saturating_sub(left_width + right_width + 2);
    let filler = if pad > 0 {
        STYLE_MODELINE.clone().width(pad as i32).render("")
    } else {
        String::new()
    };
    let footer_inner = format!("{left_rendered}{filler}{right_rendered}");

    let mode_style = STYLE_MODELINE
        .clone()
        .background(Color::from_rgb(101, 101, 101))
        .padding(0, 1, 0, 1)
        .bold(true);
    let mode_styled = mode_style.render(mode);

    // Indicator: a dim single-char marker at the far left naming the matching
    // mode: 'P' prefix, 'C' contains, '?' unknown.
    let indicator_char = match m.ctl.config.search_matching_mode {
        MatchMode::StartsWith => "P",
        MatchMode::Contains => "C",
        MatchMode::Unrecognized(_) => "?",
    };
    let indicator_style = STYLE_MODELINE.clone().faint(true).padding(0, 1, 0, 1);
    let indicator_styled = indicator_style.render(indicator_char);

    let sep_styled = inner_style.render(" | ");
    let trailing_pad = STYLE_MODELINE.render(" ");

    format!("{indicator_styled}{mode_styled}{sep_styled}{footer_inner}{trailing_pad}")
}

pub fn render_modeline_padded(m: &Model) -> String {
    let total_width = if m.screen_width > 0 {
        m.screen_width
    } else {
        DEFAULT_WIDTH
    };
    let inner_max = total_width.saturating_sub(3);
    let modeline = render_modeline(m, inner_max, &m.mode());
    let modeline_single = modeline.replace('\n', " ");
    STYLE_MODELINE
        .clone()
        .width(total_width as i32)
        .render(&modeline_single)
}
