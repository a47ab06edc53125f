use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub struct FilePos {
    pub line: usize,
    pub col: usize
}

impl FilePos {
    pub fn new(line: usize, col: usize) -> FilePos {
        FilePos {line, col}
    }

    pub fn merge(l: FilePos, r: FilePos) -> FilePos {
        FilePos {
            line: l.line.min(r.line),
            col: l.col.min(r.col)
        }
    }
}

impl Default for FilePos {
    fn default() -> FilePos {
        FilePos {line: 0, col: 0}
    }
}

// The info field refers back to the position in the source program an IR node was constructed
// from. Nodes synthesized by a transform inherit the info of the node that triggered them.
#[derive(Clone, Debug, PartialEq)]
pub struct Info {
    filename: String,
    start: FilePos,
    end: FilePos
}

impl Info {
    pub fn new(fname: &str, start: FilePos, end: FilePos) -> Info {
        let filename = fname.to_string();
        Info {filename, start, end}
    }

    pub fn merge(l: Info, r: Info) -> Info {
        let filename = if l.filename == r.filename {
            l.filename.clone()
        } else {
            "<unknown>".to_string()
        };
        Info {
            filename,
            start: FilePos::merge(l.start, r.start),
            end: FilePos::merge(l.end, r.end),
        }
    }

    pub fn error_msg(&self, msg: String) -> String {
        if self.filename.is_empty() {
            msg
        } else {
            format!("{0}\n{1}", self, msg)
        }
    }
}

impl fmt::Display for Info {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(f, "{0}, line {1}", self.filename, self.start.line)
        } else {
            write!(f, "{0}, lines {1}-{2}", self.filename, self.start.line, self.end.line)
        }
    }
}

impl Default for Info {
    fn default() -> Info {
        let start = FilePos::default();
        let end = FilePos::default();
        Info {filename: String::new(), start, end}
    }
}

pub trait InfoNode {
    fn get_info(&self) -> Info;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn error_msg_without_filename_is_bare() {
        assert_eq!(Info::default().error_msg("boom".to_string()), "boom");
    }

    #[test]
    fn error_msg_with_filename_has_location() {
        let i = Info::new("f.src", FilePos::new(3, 0), FilePos::new(3, 4));
        assert_eq!(i.error_msg("boom".to_string()), "f.src, line 3\nboom");
    }

    #[test]
    fn merge_picks_smallest_positions() {
        let l = Info::new("f.src", FilePos::new(3, 2), FilePos::new(4, 1));
        let r = Info::new("f.src", FilePos::new(2, 5), FilePos::new(5, 0));
        let m = Info::merge(l, r);
        assert_eq!(m.error_msg("x".to_string()), "f.src, lines 2-4\nx");
    }
}
