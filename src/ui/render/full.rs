use crate::ui::model::Model;

pub fn render_full(m: &Model) -> String {
    let mut lines = m.render_field_block();
    lines.extend(m.render_main_content().lines().map(str::to_string));
    let first_line = crate::ui::render::modeline::render_modeline_padded(m)
        .lines()
        .next()
        .unwrap_or("")
        .to_string();
    lines.push(first_line);
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use crate::option::SuggestOption;
    use crate::ui::Msg;
    use crate::ui::model::{Launch, initial_model};
    use regex::Regex;

    // helper to strip ANSI CSI sequences from rendered output for assertions
    fn strip_ansi(s: &str) -> String {
        let re = Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").unwrap();
        re.replace_all(s, "").to_string()
    }

    fn launch(n: usize) -> Launch {
        Launch {
            options: (0..n)
                .map(|i| SuggestOption::new(format!("k{i}"), format!("item {}", i + 1)))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn render_full_matches_height() {
        let sizes = [(80usize, 24usize), (100usize, 10usize), (40usize, 20usize)];
        for (w, h) in sizes.iter().cloned() {
            let mut m = initial_model(launch(50));
            m.update(Msg::WindowSize {
                width: w,
                height: h,
            });
            // open the dropdown so the list area is populated
            m.update(Msg::KeyDown);
            let stripped = strip_ansi(&m.render_full());
            let lines: Vec<&str> = stripped.lines().collect();
            assert_eq!(
                lines.len(),
                h,
                "height mismatch for {w}x{h}: got {} lines\n<<output>>\n{stripped}",
                lines.len()
            );
        }
    }

    #[test]
    fn modeline_is_last_line() {
        let mut m = initial_model(launch(3));
        m.update(Msg::WindowSize {
            width: 80,
            height: 24,
        });
        let stripped = strip_ansi(&m.render_full());
        let last = stripped.lines().last().unwrap_or("").to_string();
        let modeline = strip_ansi(&crate::ui::render_modeline_padded(&m));
        assert_eq!(last, modeline.lines().next().unwrap_or(""));
    }

    #[test]
    fn field_block_leads_and_dropdown_follows() {
        let mut m = initial_model(launch(30));
        m.update(Msg::WindowSize {
            width: 60,
            height: 12,
        });
        m.update(Msg::Rune('i'));
        m.update(Msg::Rune('t'));
        m.update(Msg::Rune('e'));
        m.update(Msg::Rune('m'));
        m.update(Msg::Rune(' '));
        m.update(Msg::Rune('2'));
        let stripped = strip_ansi(&m.render_full());
        let lines: Vec<&str> = stripped.lines().collect();
        assert!(lines[1].contains("> item 2"), "{stripped}");
        // "item 2" and "item 20".."item 29" match; only per_page rows fit
        let rows: Vec<&&str> = lines[3..lines.len() - 1]
            .iter()
            .filter(|l| l.contains("item"))
            .collect();
        assert_eq!(rows.len(), m.per_page);
        assert!(rows[0].trim_start_matches(['▸', ' ']).starts_with("item 2"));
    }
}
