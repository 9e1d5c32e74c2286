#[cfg(test)]
mod common;


#[cfg(test)]
mod fir_create_tests;


#[cfg(test)]
mod fir_status_tests;

#[cfg(test)]
mod fir_assign_tests;

#[cfg(test)]
mod analytics_tests;

#[cfg(test)]
mod utils_tests;




#[cfg(test)]
mod http_client_tests;
