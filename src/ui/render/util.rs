use lipgloss::Style;

pub fn normalize_and_pad(lines: Vec<String>, total_width: usize, per: usize) -> String {
    let line_style = Style::new().width(total_width as i32);
    let mut normalized: Vec<String> = lines.into_iter().map(|l| line_style.render(&l)).collect();
    normalized.resize_with(per, || line_style.render(""));
    normalized.join("\n")
}

// Truncate or pad a rendered block to exactly `n` lines.
pub fn fit_lines(block: &str, n: usize) -> Vec<String> {
    let mut out: Vec<String> = block.lines().map(str::to_string).collect();
    out.resize(n, String::new());
    out
}
