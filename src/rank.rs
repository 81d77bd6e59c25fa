/// Ranks the name variants of one merged place.
///
/// Keywords are ordered most specific first; position `i` in a table of
/// `n` keywords contributes a factor of `n - i`. An exact word match is
/// worth 3x that factor, a word ending in the keyword 2x, a substring
/// hit anywhere 1x; a name scores the maximum over all keywords. The
/// constants are policy inherited from the map this pipeline feeds, not
/// anything principled.
pub struct KeywordRanker {
    keywords: Vec<String>,
}

impl KeywordRanker {
    pub fn new<'a>(keywords: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            keywords: keywords.into_iter().map(|x| x.to_lowercase()).collect(),
        }
    }

    pub fn score(&self, name: &str) -> usize {
        let text = name.to_lowercase();
        let words: Vec<&str> = text.split_whitespace().collect();

        let mut best = 0;
        for (index, keyword) in self.keywords.iter().enumerate() {
            let factor = self.keywords.len() - index;
            let score = if words.iter().any(|x| *x == keyword.as_str()) {
                3 * factor
            } else if words.iter().any(|x| x.ends_with(keyword.as_str())) {
                2 * factor
            } else if text.contains(keyword.as_str()) {
                factor
            } else {
                0
            };
            best = best.max(score);
        }
        best
    }

    /// Sorts best first. Equal non-zero scores tie-break on length (the
    /// shorter variant reads as the official label); names without any
    /// keyword signal keep their input order.
    pub fn rank(&self, names: &mut [&str]) {
        names.sort_by(|a, b| {
            let (ra, rb) = (self.score(a), self.score(b));
            if ra == rb && ra != 0 {
                a.len().cmp(&b.len())
            } else {
                rb.cmp(&ra)
            }
        });
    }

    pub fn best<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
        let mut names: Vec<&str> = names.into_iter().collect();
        self.rank(&mut names);
        names.first().copied()
    }
}
