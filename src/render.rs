use glam::DVec2;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        Widget,
        canvas::{Canvas, Painter, Shape},
    },
};

use crate::world::World;

/// Straight RGBA color, alpha in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const RED: Rgba = Rgba::rgb(255, 0, 0);
    pub const LIGHT_BLUE: Rgba = Rgba::rgb(173, 216, 230);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Terminal color of this color painted over black.
    /// Terminals have no alpha channel, so translucency is composited up front.
    pub fn over_black(&self) -> Color {
        let scale = |channel: u8| (channel as f64 * self.a).round() as u8;
        Color::Rgb(scale(self.r), scale(self.g), scale(self.b))
    }
}

/// A 2D raster surface that can be cleared and filled with circles
pub trait Surface {
    fn size(&self) -> (f64, f64);
    fn resize(&mut self, width: f64, height: f64);
    fn clear(&mut self);
    fn set_color(&mut self, color: Rgba);
    /// Fills the whole surface with the current color
    fn background(&mut self);
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Background(Rgba),
    Circle {
        center: DVec2,
        radius: f64,
        color: Rgba,
    },
}

/// Surface that records what was drawn, for a terminal widget (or a test) to replay
#[derive(Debug, Clone)]
pub struct DisplayList {
    width: f64,
    height: f64,
    color: Rgba,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            color: Rgba::BLACK,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Surface for DisplayList {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) {
        self.commands.clear();
    }

    fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    fn background(&mut self) {
        self.commands.push(DrawCommand::Background(self.color));
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64) {
        self.commands.push(DrawCommand::Circle {
            center: DVec2::new(x, y),
            radius,
            color: self.color,
        });
    }
}

/// Draws the world. Reads state only.
pub fn draw<S: Surface + ?Sized>(world: &World, surface: &mut S) {
    let config = world.config();

    surface.clear();
    surface.set_color(Rgba::BLACK);
    surface.background();

    surface.set_color(Rgba::RED);
    for enemy in &world.enemies {
        surface.fill_circle(enemy.position.x, enemy.position.y, config.enemy_radius);
    }

    surface.set_color(Rgba::LIGHT_BLUE);
    let player = world.player.position;
    surface.fill_circle(player.x, player.y, config.player_radius);

    if let (Some(center), Some(alpha)) = (
        world.attack_center(),
        world.player.attack.fade(config.attack_duration),
    ) {
        surface.set_color(Rgba::WHITE.with_alpha(alpha));
        surface.fill_circle(center.x, center.y, config.attack_radius);
    }
}

/// Filled circle for the braille canvas, in canvas coordinates (y up)
struct Disc {
    x: f64,
    y: f64,
    radius: f64,
    color: Color,
}

/// Sampling step across a disc, in world units. Half a braille dot.
const FILL_STEP: f64 = 2.0;

impl Shape for Disc {
    fn draw(&self, painter: &mut Painter) {
        let steps = (self.radius / FILL_STEP).ceil() as i64;
        for i in -steps..=steps {
            for j in -steps..=steps {
                let dx = i as f64 * FILL_STEP;
                let dy = j as f64 * FILL_STEP;
                if dx * dx + dy * dy > self.radius * self.radius {
                    continue;
                }
                if let Some((x, y)) = painter.get_point(self.x + dx, self.y + dy) {
                    painter.paint(x, y, self.color);
                }
            }
        }
    }
}

impl Widget for &DisplayList {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = self.height;
        let background = self
            .commands
            .iter()
            .rev()
            .find_map(|command| match command {
                DrawCommand::Background(color) => Some(color.over_black()),
                _ => None,
            })
            .unwrap_or(Color::Reset);

        Canvas::default()
            .marker(Marker::Braille)
            .background_color(background)
            .x_bounds([0.0, self.width])
            .y_bounds([0.0, self.height])
            .paint(|ctx| {
                for command in &self.commands {
                    if let DrawCommand::Circle {
                        center,
                        radius,
                        color,
                    } = command
                    {
                        // World y grows downward, canvas y grows upward
                        ctx.draw(&Disc {
                            x: center.x,
                            y: height - center.y,
                            radius: *radius,
                            color: color.over_black(),
                        });
                    }
                }
            })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::entities::{AttackState, Direction, Enemy};

    fn world() -> World {
        let mut world = World::new(200.0, 100.0, GameConfig::default());
        world.enemies = vec![Enemy::new(10.0, 20.0), Enemy::new(30.0, 40.0)];
        world
    }

    #[test]
    fn test_draw_idle_world() {
        let mut surface = DisplayList::new(200.0, 100.0);
        draw(&world(), &mut surface);

        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::Background(Rgba::BLACK),
                DrawCommand::Circle {
                    center: DVec2::new(10.0, 20.0),
                    radius: 8.0,
                    color: Rgba::RED
                },
                DrawCommand::Circle {
                    center: DVec2::new(30.0, 40.0),
                    radius: 8.0,
                    color: Rgba::RED
                },
                DrawCommand::Circle {
                    center: DVec2::new(100.0, 50.0),
                    radius: 10.0,
                    color: Rgba::LIGHT_BLUE
                },
            ]
        );
    }

    #[test]
    fn test_draw_fading_attack() {
        let mut world = world();
        world.player.attack = AttackState::Attacking {
            direction: Direction::Left,
            time_since: 75.0,
        };
        let mut surface = DisplayList::new(200.0, 100.0);
        draw(&world, &mut surface);

        assert_eq!(
            surface.commands().last(),
            Some(&DrawCommand::Circle {
                center: DVec2::new(70.0, 50.0),
                radius: 30.0,
                color: Rgba::WHITE.with_alpha(0.75)
            })
        );
    }

    #[test]
    fn test_draw_clears_previous_frame() {
        let mut surface = DisplayList::new(200.0, 100.0);
        draw(&world(), &mut surface);
        draw(&world(), &mut surface);
        assert_eq!(surface.commands().len(), 4);
    }

    #[test]
    fn test_over_black_composites_alpha() {
        assert_eq!(Rgba::WHITE.over_black(), Color::Rgb(255, 255, 255));
        assert_eq!(
            Rgba::WHITE.with_alpha(0.5).over_black(),
            Color::Rgb(128, 128, 128)
        );
        assert_eq!(Rgba::RED.with_alpha(0.0).over_black(), Color::Rgb(0, 0, 0));
    }

    #[test]
    fn test_display_list_paints_into_buffer() {
        let mut surface = DisplayList::new(80.0, 64.0);
        surface.set_color(Rgba::BLACK);
        surface.background();
        surface.set_color(Rgba::RED);
        surface.fill_circle(40.0, 32.0, 12.0);

        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        (&surface).render(area, &mut buf);

        let painted = buf
            .content()
            .iter()
            .filter(|cell| cell.fg == Color::Rgb(255, 0, 0))
            .count();
        assert!(painted > 0);
    }
}
