mod helpers;

mod review_test;
mod router_test;
