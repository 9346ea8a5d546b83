pub mod booking_routes;
pub mod car_routes;
pub mod favorite_routes;
pub mod review_routes;
