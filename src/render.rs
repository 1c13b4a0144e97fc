// VIRTMEM: Paging Simulation and Page Fault Plotting
// Copyright (C) 2025 The virtmem authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//! Drawing of a [`ChartRequest`] into an image file.

use std::path::Path;

use plotters::prelude::*;

use crate::chart::ChartRequest;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
}

fn draw_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

/// Something that can turn a chart request into a file.
pub trait Renderer {
    fn render(&mut self, request: &ChartRequest, output: &Path) -> Result<(), RenderError>;
}

/// Line colors, assigned to the series in drawing order.
pub const PALETTE: [RGBColor; 3] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
];

/// Renders PNG files with the plotters bitmap backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for PngRenderer {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

impl Renderer for PngRenderer {
    fn render(&mut self, request: &ChartRequest, output: &Path) -> Result<(), RenderError> {
        let root = BitMapBackend::new(output, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut builder = ChartBuilder::on(&root);
        builder
            .margin(if request.tight_layout { 8 } else { 24 })
            .x_label_area_size(if request.x_label.is_some() { 45 } else { 30 })
            .y_label_area_size(55);
        if let Some(title) = &request.title {
            builder.caption(title, ("sans-serif", 24));
        }

        let x_range = (0i64..request.x_max).with_key_points(request.ticks.clone());
        let mut chart = builder
            .build_cartesian_2d(x_range, request.y_min()..request.y_max())
            .map_err(draw_err)?;

        let mut mesh = chart.configure_mesh();
        mesh.x_labels(request.ticks.len());
        if let Some(label) = &request.x_label {
            mesh.x_desc(label.as_str());
        }
        mesh.draw().map_err(draw_err)?;

        for (series, color) in request.series.iter().zip(PALETTE.iter().cycle()) {
            let color = *color;
            let points = request
                .frames
                .iter()
                .copied()
                .zip(series.values.iter().copied());
            let drawn = chart
                .draw_series(LineSeries::new(points, color.stroke_width(2)).point_size(3))
                .map_err(draw_err)?;
            if request.show_legend {
                drawn.label(series.name.as_str()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            }
        }

        if request.show_legend {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }
}
