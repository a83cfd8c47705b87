/// How a rewritable region is found inside an index document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Locator {
    /// Everything between a start and an end marker.
    Markers { start: String, end: String },
    /// Everything under a heading line, up to the next heading of the same
    /// level or the end of the document.
    Heading { line: String },
}

/// A document cut in three around a region. `prefix` ends with the start
/// marker (or heading line) and `suffix` starts with the end marker (or next
/// heading); both are written back verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Region<'a> {
    pub prefix: &'a str,
    pub interior: &'a str,
    pub suffix: &'a str,
    by_heading: bool,
}

impl Locator {
    pub fn markers(start: &str, end: &str) -> Self {
        Locator::Markers {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    pub fn heading(line: &str) -> Self {
        Locator::Heading {
            line: line.to_string(),
        }
    }

    /// Finds the region in `document`. On failure, returns the marker that
    /// could not be found.
    pub fn locate<'a>(&self, document: &'a str) -> Result<Region<'a>, &str> {
        match self {
            Locator::Markers { start, end } => {
                let start_at = document.find(start.as_str()).ok_or(start.as_str())?;
                let interior_at = start_at + start.len();
                let end_at = document[interior_at..]
                    .find(end.as_str())
                    .map(|offset| interior_at + offset)
                    .ok_or(end.as_str())?;
                Ok(Region {
                    prefix: &document[..interior_at],
                    interior: &document[interior_at..end_at],
                    suffix: &document[end_at..],
                    by_heading: false,
                })
            }
            Locator::Heading { line } => locate_heading(document, line).ok_or(line.as_str()),
        }
    }

    /// An empty region, as written into a freshly seeded document.
    pub fn placeholder(&self) -> String {
        match self {
            Locator::Markers { start, end } => format!("{start}\n{end}\n"),
            Locator::Heading { line } => format!("{line}\n"),
        }
    }
}

fn heading_level(line: &str) -> usize {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level > 0 && line[level..].starts_with([' ', '\t']) {
        level
    } else {
        0
    }
}

fn locate_heading<'a>(document: &'a str, heading: &str) -> Option<Region<'a>> {
    let heading = heading.trim_end();
    let level = heading_level(heading);

    let mut offset = 0;
    let mut heading_end = None;
    let mut section_end = document.len();
    for line in document.split_inclusive('\n') {
        let text = line.trim_end();
        match heading_end {
            None if text == heading => heading_end = Some(offset + text.len()),
            Some(_) if level > 0 && heading_level(text) == level => {
                section_end = offset;
                break;
            }
            _ => {}
        }
        offset += line.len();
    }

    let interior_at = heading_end?;
    Some(Region {
        prefix: &document[..interior_at],
        interior: &document[interior_at..section_end],
        suffix: &document[section_end..],
        by_heading: true,
    })
}

impl Region<'_> {
    /// Reassembles the document with `content` as the region's interior.
    pub fn replace(&self, content: &str) -> String {
        let content = content.trim_end_matches('\n');
        let mut out =
            String::with_capacity(self.prefix.len() + content.len() + self.suffix.len() + 4);
        out.push_str(self.prefix);
        out.push('\n');
        if self.by_heading {
            out.push('\n');
        }
        if !content.is_empty() {
            out.push_str(content);
            out.push('\n');
        }
        if self.by_heading && !self.suffix.is_empty() {
            out.push('\n');
        }
        out.push_str(self.suffix);
        out
    }
}
