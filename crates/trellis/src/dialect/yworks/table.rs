//! `<y:TableNode>`: a node divided into rows and columns (swimlanes).

use roxmltree::Node;

use trellis_core::{
    draw::{Group, Paint, RenderLayer, RenderNode, StrokeDefinition},
    geometry::Geometry,
    identifier::Id,
};
use trellis_markup::{
    AttributeReader, Markup,
    error::{DiagnosticCollector, ErrorCode, Parsed},
    markup::{self, ns},
};

use super::{NodeAppearance, parse_insets};
use crate::{
    element::{BuildContext, ElementKind, Label},
    layout::table::{Column, Row, Table, TableStyle, layout_table},
};

const DEFAULT_COLUMN_WIDTH: f32 = 120.0;
const DEFAULT_ROW_HEIGHT: f32 = 80.0;

/// A table node: outer appearance, table structure and lane colors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableNode {
    appearance: NodeAppearance,
    table: Table,
    style: TableStyle,
}

impl TableNode {
    pub fn appearance(&self) -> &NodeAppearance {
        &self.appearance
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn style(&self) -> &TableStyle {
        &self.style
    }
}

fn parse_style(realizer: Node<'_, '_>, collector: &mut DiagnosticCollector) -> TableStyle {
    let mut style = TableStyle::default();
    let Some(properties) = markup::child(realizer, ns::YWORKS, "StyleProperties") else {
        return style;
    };
    for property in markup::children(properties, ns::YWORKS, "Property") {
        let reader = AttributeReader::new(property);
        match reader.str("name") {
            Some("yed.table.header.color.main") => {
                style.header_main = reader.color("value", collector).unwrap_or(style.header_main);
            }
            Some("yed.table.header.color.alternating") => {
                style.header_alternating = reader
                    .color("value", collector)
                    .unwrap_or(style.header_alternating);
            }
            Some("yed.table.lane.color.main") => {
                style.lane_main = reader.color("value", collector).unwrap_or(style.lane_main);
            }
            Some("yed.table.lane.color.alternating") => {
                style.lane_alternating = reader
                    .color("value", collector)
                    .unwrap_or(style.lane_alternating);
            }
            Some("yed.table.lane.style") => {
                style.lanes_as_columns = reader.str("value") == Some("lane.style.columns");
            }
            _ => {}
        }
    }
    style
}

fn parse_table(
    realizer: Node<'_, '_>,
    id: Id,
    collector: &mut DiagnosticCollector,
) -> Table {
    let Some(node) = markup::child(realizer, ns::YWORKS, "Table") else {
        collector.emit(
            AttributeReader::new(realizer)
                .for_element(id)
                .diagnostic(format!("table node `{id}` has no <y:Table>"))
                .with_code(ErrorCode::E102)
                .with_help("the node is drawn without rows or columns"),
        );
        return Table::default();
    };

    let reader = AttributeReader::new(node).for_element(id);
    let default_width = reader.f32_or("defaultColumnWidth", DEFAULT_COLUMN_WIDTH, collector);
    let default_height = reader.f32_or("defaultRowHeight", DEFAULT_ROW_HEIGHT, collector);
    let default_min_width = reader.f32_or("defaultMinimumColumnWidth", 0.0, collector);
    let default_min_height = reader.f32_or("defaultMinimumRowHeight", 0.0, collector);

    let columns = markup::child(node, ns::YWORKS, "Columns")
        .into_iter()
        .flat_map(|columns| markup::children(columns, ns::YWORKS, "Column"))
        .enumerate()
        .map(|(idx, column)| {
            let reader = AttributeReader::new(column).for_element(id);
            let mut parsed = Column::new(
                reader.str("id").map_or_else(|| format!("column_{idx}"), str::to_string),
                reader.f32_or("width", default_width, collector),
            )
            .with_insets(parse_insets(markup::child(column, ns::YWORKS, "Insets"), collector));
            parsed.minimum_width = reader.f32_or("minimumWidth", default_min_width, collector);
            parsed
        })
        .collect();

    let rows = markup::child(node, ns::YWORKS, "Rows")
        .into_iter()
        .flat_map(|rows| markup::children(rows, ns::YWORKS, "Row"))
        .enumerate()
        .map(|(idx, row)| {
            let reader = AttributeReader::new(row).for_element(id);
            let mut parsed = Row::new(
                reader.str("id").map_or_else(|| format!("row_{idx}"), str::to_string),
                reader.f32_or("height", default_height, collector),
            )
            .with_insets(parse_insets(markup::child(row, ns::YWORKS, "Insets"), collector));
            parsed.minimum_height = reader.f32_or("minimumHeight", default_min_height, collector);
            parsed
        })
        .collect();

    Table {
        columns,
        rows,
        default_column_insets: parse_insets(
            markup::child(node, ns::YWORKS, "DefaultColumnInsets"),
            collector,
        ),
        default_row_insets: parse_insets(markup::child(node, ns::YWORKS, "DefaultRowInsets"), collector),
        insets: parse_insets(markup::child(node, ns::YWORKS, "Insets"), collector),
    }
}

impl ElementKind for TableNode {
    const LAYER: RenderLayer = RenderLayer::Container;

    fn parse(markup: Markup<'_, '_>, id: Id) -> Parsed<Self> {
        let mut collector = DiagnosticCollector::new();
        let Some(realizer) = markup.realizer() else {
            return collector.finish(Self::default());
        };
        let node = Self {
            appearance: NodeAppearance::parse(realizer, id, &mut collector),
            table: parse_table(realizer, id, &mut collector),
            style: parse_style(realizer, &mut collector),
        };
        collector.finish(node)
    }

    fn build(&self, id: Id, _ctx: &BuildContext<'_>) -> Parsed<RenderNode> {
        let geometry = self.appearance.geometry;
        let mut group = Group::new().with_id(id.to_mask()).with_class("table");
        group.push(RenderNode::rect(geometry, self.appearance.paint()));

        let grid_stroke = self
            .appearance
            .border
            .as_ref()
            .map(|border| StrokeDefinition::new(border.color(), 0.5));
        let layout = layout_table(&self.table, &self.style).translate(
            geometry.x() + self.table.insets.left(),
            geometry.y() + self.table.insets.top(),
        );
        for cell in layout.cells() {
            group.push(RenderNode::rect(
                cell.bounds,
                Paint::new(Some(cell.fill), grid_stroke.clone()),
            ));
        }

        self.appearance.push_labels(&mut group);
        Parsed::clean(RenderNode::Group(group))
    }

    fn geometry(&self) -> Option<&Geometry> {
        Some(&self.appearance.geometry)
    }

    fn geometry_mut(&mut self) -> Option<&mut Geometry> {
        Some(&mut self.appearance.geometry)
    }

    fn labels(&self) -> &[Label] {
        &self.appearance.labels
    }

    fn labels_mut(&mut self) -> &mut [Label] {
        &mut self.appearance.labels
    }
}
