//! Rectangular view over an HTML table
//!
//! `colspan` and `rowspan` are expanded so that every logical column of the
//! table has the same index in every row. Slots covered by a spanning cell
//! carry a copy of it with `origin` unset.

use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

static ROW: LazyLock<Selector> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Infallible with a valid static selector
    Selector::parse("tr").expect("row selector")
});

static IMAGE: LazyLock<Selector> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Infallible with a valid static selector
    Selector::parse("img").expect("image selector")
});

/// Upper bound for a single span, guarding against absurd attribute values
const MAX_SPAN: usize = 64;

/// Image found inside a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Image {
    /// `src` attribute without query string or fragment
    pub src: String,
    /// `alt` attribute, else `title`, whitespace-normalised
    pub alt: String,
}

/// One slot of the grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Cell {
    /// Text content with all whitespace (non-breaking included) collapsed
    pub text: String,
    /// First image of the cell
    pub image: Option<Image>,
    /// Set on the slot where the source cell starts
    pub origin: bool,
}

impl Cell {
    fn from_element(element: ElementRef<'_>) -> Self {
        let image = element.select(&IMAGE).next().map(|img| {
            let attrs = img.value();
            let src = attrs
                .attr("src")
                .unwrap_or_default()
                .split(['?', '#'])
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            let alt = attrs
                .attr("alt")
                .filter(|alt| !alt.trim().is_empty())
                .or_else(|| attrs.attr("title"))
                .map(collapse_whitespace)
                .unwrap_or_default();
            Image { src, alt }
        });

        Self {
            text: collapse_whitespace(&element.text().collect::<String>()),
            image,
            origin: true,
        }
    }

    /// Whether the slot carries neither text nor an image
    pub fn is_blank(&self) -> bool {
        self.text.is_empty() && self.image.is_none()
    }
}

/// Table expanded into equally long rows
#[derive(Debug, Clone, Default)]
pub(crate) struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// Build the grid for `table`, ignoring rows of nested tables
    pub fn from_table(table: ElementRef<'_>) -> Self {
        let mut slots: Vec<Vec<Option<Cell>>> = Vec::new();

        let own_rows = table
            .select(&ROW)
            .filter(|row| nearest_table(*row).is_some_and(|t| t.id() == table.id()));

        for (r, row) in own_rows.enumerate() {
            if slots.len() <= r {
                slots.resize_with(r + 1, Vec::new);
            }
            let mut col = 0;
            let cells = row
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|el| matches!(el.value().name(), "td" | "th"));

            for element in cells {
                while slots[r].get(col).is_some_and(Option::is_some) {
                    col += 1;
                }
                let cell = Cell::from_element(element);
                let colspan = span(element, "colspan");
                let rowspan = span(element, "rowspan");

                for dr in 0..rowspan {
                    let target = r + dr;
                    if slots.len() <= target {
                        slots.resize_with(target + 1, Vec::new);
                    }
                    let line = &mut slots[target];
                    if line.len() < col + colspan {
                        line.resize_with(col + colspan, || None);
                    }
                    for dc in 0..colspan {
                        let mut copy = cell.clone();
                        copy.origin = dr == 0 && dc == 0;
                        line[col + dc] = Some(copy);
                    }
                }
                col += colspan;
            }
        }

        let width = slots.iter().map(Vec::len).max().unwrap_or(0);
        let rows = slots
            .into_iter()
            .map(|line| {
                let mut line: Vec<Cell> = line.into_iter().map(Option::unwrap_or_default).collect();
                line.resize_with(width, Cell::default);
                line
            })
            .collect();

        Self { rows }
    }

    /// Swap rows and columns
    pub fn transposed(&self) -> Self {
        let width = self.width();
        let rows = (0..width)
            .map(|c| {
                self.rows
                    .iter()
                    .map(|row| row.get(c).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Rows of the grid
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Slot at `(row, col)`
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row)?.get(col)
    }
}

fn nearest_table(row: ElementRef<'_>) -> Option<ElementRef<'_>> {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table")
}

fn span(element: ElementRef<'_>, attribute: &str) -> usize {
    element
        .value()
        .attr(attribute)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, MAX_SPAN)
}

/// Collapse runs of whitespace, including non-breaking spaces, to one space
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn grid_of(html: &str) -> Grid {
        let document = Html::parse_document(html);
        let selector = Selector::parse("table").expect("selector");
        let table = document.select(&selector).next().expect("table present");
        Grid::from_table(table)
    }

    fn texts(grid: &Grid) -> Vec<Vec<&str>> {
        grid.rows()
            .iter()
            .map(|row| row.iter().map(|c| c.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn colspan_is_expanded() {
        let grid = grid_of(
            "<table><tr><td></td><td colspan=\"2\">ma</td></tr>\
             <tr><td>óra</td><td>06</td><td>12</td></tr></table>",
        );
        assert_eq!(texts(&grid), vec![vec!["", "ma", "ma"], vec!["óra", "06", "12"]]);
        assert!(grid.cell(0, 1).is_some_and(|c| c.origin));
        assert!(grid.cell(0, 2).is_some_and(|c| !c.origin));
    }

    #[test]
    fn rowspan_shifts_following_cells() {
        let grid = grid_of(
            "<table><tr><td rowspan=\"2\">A</td><td>1</td></tr>\
             <tr><td>2</td></tr></table>",
        );
        assert_eq!(texts(&grid), vec![vec!["A", "1"], vec!["A", "2"]]);
    }

    #[test]
    fn whitespace_and_nbsp_are_collapsed() {
        let grid = grid_of("<table><tr><td>\n  12&nbsp;°C \t</td></tr></table>");
        assert_eq!(grid.cell(0, 0).map(|c| c.text.as_str()), Some("12 °C"));
    }

    #[test]
    fn image_attributes_are_captured() {
        let grid = grid_of(
            "<table><tr><td><img src=\"/img/n02.gif?v=3\" title=\"kissé felhős\"></td></tr></table>",
        );
        let image = grid.cell(0, 0).and_then(|c| c.image.clone()).expect("image");
        assert_eq!(image.src, "/img/n02.gif");
        assert_eq!(image.alt, "kissé felhős");
    }

    #[test]
    fn nested_table_rows_are_ignored() {
        let grid = grid_of(
            "<table><tr><td>x<table><tr><td>inner</td></tr></table></td><td>y</td></tr></table>",
        );
        assert_eq!(grid.rows().len(), 1);
        assert_eq!(grid.width(), 2);
    }

    #[test]
    fn short_rows_are_padded_and_transpose_swaps_axes() {
        let grid = grid_of("<table><tr><td>a</td><td>b</td></tr><tr><td>c</td></tr></table>");
        assert_eq!(texts(&grid), vec![vec!["a", "b"], vec!["c", ""]]);
        let transposed = grid.transposed();
        assert_eq!(texts(&transposed), vec![vec!["a", "c"], vec!["b", ""]]);
    }
}
