#[derive(Debug, Clone)]
pub struct WrappedInput {
    pub rendered: String,
    pub positions: Vec<(u16, u16)>,
    pub line_count: u16,
}

/// Word-wraps the input buffer and records the (line, column) of every char
/// boundary so the cursor can be placed after wrapping. Words longer than the
/// width break mid-word.
pub fn wrap_input(text: &str, width: u16) -> WrappedInput {
    let width = width.max(1);
    let chars: Vec<char> = text.chars().collect();
    let mut rendered = String::new();
    let mut positions = Vec::with_capacity(chars.len() + 1);
    let mut line = 0u16;
    let mut col = 0u16;

    positions.push((line, col));

    for (idx, ch) in chars.iter().copied().enumerate() {
        if ch == '\n' {
            rendered.push('\n');
            line = line.saturating_add(1);
            col = 0;
            positions.push((line, col));
            continue;
        }

        if col >= width || wraps_word_here(&chars, idx, col, width) {
            rendered.push('\n');
            line = line.saturating_add(1);
            col = 0;
        }

        rendered.push(ch);
        col = col.saturating_add(1);
        if col >= width {
            rendered.push('\n');
            line = line.saturating_add(1);
            col = 0;
        }

        positions.push((line, col));
    }

    let line_count = positions
        .iter()
        .map(|(l, _)| *l)
        .max()
        .unwrap_or(0)
        .saturating_add(1);

    WrappedInput {
        rendered,
        positions,
        line_count,
    }
}

fn wraps_word_here(chars: &[char], idx: usize, col: u16, width: u16) -> bool {
    if col == 0 || chars[idx].is_whitespace() {
        return false;
    }
    if idx > 0 {
        let prev = chars[idx - 1];
        if !prev.is_whitespace() && prev != '\n' {
            return false;
        }
    }

    let word_len = chars[idx..]
        .iter()
        .take_while(|c| !c.is_whitespace() && **c != '\n')
        .count() as u16;

    word_len <= width && col.saturating_add(word_len) > width
}

/// Display wrapping for log panes: no cursor bookkeeping, continuation lines
/// carry a hanging indent so wrapped entries stay visually grouped.
pub fn wrap_display_line(text: &str, width: u16, indent: usize) -> Vec<String> {
    let width = width.max(1) as usize;
    let indent = indent.min(width.saturating_sub(1));
    let pad = " ".repeat(indent);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut chunk: Vec<char> = word.chars().collect();
        while !chunk.is_empty() {
            let first_line = lines.is_empty();
            let budget = if first_line { width } else { width - indent };
            let used = current.chars().count();
            let sep = usize::from(!current.is_empty());
            let free = budget.saturating_sub(used + sep);
            if chunk.len() <= free {
                if sep == 1 {
                    current.push(' ');
                }
                current.extend(chunk.iter());
                chunk.clear();
            } else if used == 0 {
                // Word longer than a whole line: hard-break it.
                current.extend(chunk.drain(..budget));
                let line = if first_line {
                    current.clone()
                } else {
                    format!("{pad}{current}")
                };
                lines.push(line);
                current.clear();
            } else {
                let line = if first_line {
                    current.clone()
                } else {
                    format!("{pad}{current}")
                };
                lines.push(line);
                current.clear();
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        let first_line = lines.is_empty();
        lines.push(if first_line {
            current
        } else {
            format!("{pad}{current}")
        });
    }
    lines
}
