//! Rendering
//!
//! Draws a session onto anything that looks like a 2D canvas context. The
//! browser build implements `RenderSurface` over `CanvasRenderingContext2d`.

use crate::sim::{GameSession, Rect, ToppingKind};

/// Sky gradient, top to bottom
pub const SKY_TOP: &str = "#87ceeb";
pub const SKY_BOTTOM: &str = "#e0f6ff";

/// Logical sprite names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// Bowl shown while avoiding the given topping
    Player(ToppingKind),
    /// A falling topping
    Topping(ToppingKind),
    /// Game-over picture: noodles hit by the given topping
    Splat(ToppingKind),
}

impl SpriteKey {
    /// Every sprite the game uses
    pub fn all() -> impl Iterator<Item = SpriteKey> {
        ToppingKind::ALL.into_iter().flat_map(|kind| {
            [
                SpriteKey::Player(kind),
                SpriteKey::Topping(kind),
                SpriteKey::Splat(kind),
            ]
        })
    }

    /// Asset path relative to the page
    pub fn path(self) -> &'static str {
        use ToppingKind::*;
        match self {
            SpriteKey::Player(Sambal) => "assets/players/player-avoid-sambal.png",
            SpriteKey::Player(Pangsit) => "assets/players/player-avoid-pangsit.png",
            SpriteKey::Player(DaunBawang) => "assets/players/player-avoid-daunbawang.png",
            SpriteKey::Topping(Sambal) => "assets/toppings/topping-sambal.png",
            SpriteKey::Topping(Pangsit) => "assets/toppings/topping-pangsit.png",
            SpriteKey::Topping(DaunBawang) => "assets/toppings/topping-daun-bawang.png",
            SpriteKey::Splat(Sambal) => "assets/game-over/mie-kena-sambal.png",
            SpriteKey::Splat(Pangsit) => "assets/game-over/mie-kena-pangsit.png",
            SpriteKey::Splat(DaunBawang) => "assets/game-over/mie-kena-daunbawang.png",
        }
    }

    /// Player sprite for a run (sambal bowl when nothing is selected)
    pub fn player_for(selected: Option<ToppingKind>) -> Self {
        SpriteKey::Player(selected.unwrap_or(ToppingKind::Sambal))
    }

    /// Game-over sprite for a run (sambal splat when nothing is selected)
    pub fn splat_for(selected: Option<ToppingKind>) -> Self {
        SpriteKey::Splat(selected.unwrap_or(ToppingKind::Sambal))
    }
}

/// Resolves sprites; missing ones are simply not drawn
pub trait AssetStore {
    type Image;

    fn image(&self, key: SpriteKey) -> Option<&Self::Image>;
}

/// Minimal 2D drawing surface
pub trait RenderSurface {
    type Image;

    /// Fill the whole surface with a top-to-bottom gradient
    fn fill_vertical_gradient(&mut self, top: &str, bottom: &str);

    fn draw_image(&mut self, image: &Self::Image, rect: Rect);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    /// Rotate by `angle` radians around the current origin
    fn rotate(&mut self, angle: f32);
}

/// Draw the current frame
pub fn render<S, A>(session: &GameSession, surface: &mut S, assets: &A)
where
    S: RenderSurface,
    A: AssetStore<Image = S::Image>,
{
    surface.fill_vertical_gradient(SKY_TOP, SKY_BOTTOM);

    if let Some(image) = assets.image(SpriteKey::player_for(session.selected)) {
        surface.save();
        surface.draw_image(image, session.player.rect());
        surface.restore();
    }

    for topping in &session.toppings {
        let Some(image) = assets.image(SpriteKey::Topping(topping.kind)) else {
            continue;
        };
        let rect = topping.rect();
        let center = rect.center();

        surface.save();
        surface.translate(center.x, center.y);
        surface.rotate(topping.rotation.to_radians());
        surface.translate(-center.x, -center.y);
        surface.draw_image(image, rect);
        surface.restore();
    }
}
